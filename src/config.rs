#[derive(Clone, Debug)]
pub struct ServerIdent {
    pub product: String,
    pub version: String,
}

impl ServerIdent {
    pub fn new(product: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            version: version.into(),
        }
    }

    pub fn load() -> Self {
        let product = std::env::var("SERVER_PRODUCT")
            .unwrap_or_else(|_| env!("CARGO_PKG_NAME").to_string());
        let version = std::env::var("SERVER_VERSION")
            .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());
        Self { product, version }
    }

    pub(crate) fn header_line(&self) -> String {
        format!("Server: {}/{}\r\n", self.product, self.version)
    }
}
