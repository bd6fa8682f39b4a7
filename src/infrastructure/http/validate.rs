//! Request Validation

use crate::domain::model::{CourierPatch, CourierStatus, NewCourier, TransportType};

use super::dto::{CreateCourierRequest, UpdateCourierRequest};

pub fn validate_create(req: CreateCourierRequest) -> Result<NewCourier, &'static str> {
    validate_name(&req.name)?;
    validate_phone(&req.phone)?;
    let status = parse_status(&req.status)?;
    let transport_type = parse_transport(&req.transport_type)?;

    Ok(NewCourier {
        name: req.name,
        phone: req.phone,
        status,
        transport_type,
    })
}

pub fn validate_update(req: UpdateCourierRequest) -> Result<CourierPatch, &'static str> {
    if req.id <= 0 {
        return Err("Invalid id");
    }

    // An empty string means "not supplied", same as a missing field.
    let name = req.name.filter(|s| !s.is_empty());
    let phone = req.phone.filter(|s| !s.is_empty());
    let status = req.status.filter(|s| !s.is_empty());
    let transport_type = req.transport_type.filter(|s| !s.is_empty());

    if name.is_none() && phone.is_none() && status.is_none() && transport_type.is_none() {
        return Err("Must provide at least one of name, phone, status, or transport_type");
    }

    if let Some(name) = &name {
        validate_name(name)?;
    }
    if let Some(phone) = &phone {
        validate_phone(phone)?;
    }
    let status = status.as_deref().map(parse_status).transpose()?;
    let transport_type = transport_type.as_deref().map(parse_transport).transpose()?;

    Ok(CourierPatch {
        id: req.id,
        name,
        phone,
        status,
        transport_type,
    })
}

fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() || name.chars().count() > 100 {
        return Err("Name is too long or empty");
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if phone.is_empty() {
        return Err("Phone is empty");
    }

    // Exactly "+" followed by 11 decimal digits
    if phone.len() != 12 || !phone.starts_with('+') {
        return Err("Invalid phone");
    }
    if !phone[1..].bytes().all(|b| b.is_ascii_digit()) {
        return Err("Invalid phone");
    }

    Ok(())
}

fn parse_status(status: &str) -> Result<CourierStatus, &'static str> {
    CourierStatus::parse(status).ok_or("Invalid status")
}

fn parse_transport(transport_type: &str) -> Result<TransportType, &'static str> {
    TransportType::parse(transport_type).ok_or("Invalid transport type")
}
