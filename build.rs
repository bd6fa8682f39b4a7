fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    // Compile the orders-service client stubs with tonic
    tonic_prost_build::configure()
        .build_server(false)
        .compile_protos(&["proto/order/v1/order.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/");

    Ok(())
}
