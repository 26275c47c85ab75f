//! CORS middleware: permissive, since the realtime demo surface is
//! consumed directly from a browser with no auth boundary to protect.

use tower_http::cors::CorsLayer;

pub fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_layer_creates_without_panic() {
        let _cors = cors_layer();
    }
}
