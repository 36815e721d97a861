#[actix_web::main]
async fn main() -> std::io::Result<()> {
    cotizador_server::run().await
}
