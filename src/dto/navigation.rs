use serde::Serialize;
use utoipa::ToSchema;

/// Named place a client is sent to after a state-changing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Destination {
    ProductList,
    Cart,
    ProductDetail { slug: String },
}

impl Destination {
    pub fn product_detail(slug: impl Into<String>) -> Self {
        Destination::ProductDetail { slug: slug.into() }
    }

    pub fn location(&self) -> String {
        match self {
            Destination::ProductList => "/api/products".to_string(),
            Destination::Cart => "/api/cart".to_string(),
            Destination::ProductDetail { slug } => format!("/api/products/{slug}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Redirect {
    pub destination: Destination,
    pub location: String,
}

impl From<Destination> for Redirect {
    fn from(destination: Destination) -> Self {
        let location = destination.location();
        Self {
            destination,
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations_point_at_api_routes() {
        assert_eq!(Destination::ProductList.location(), "/api/products");
        assert_eq!(Destination::Cart.location(), "/api/cart");
        assert_eq!(
            Destination::product_detail("ferris-mug").location(),
            "/api/products/ferris-mug"
        );
    }

    #[test]
    fn redirect_serializes_route_name_and_location() {
        let redirect = Redirect::from(Destination::product_detail("ferris-mug"));
        let json = serde_json::to_value(&redirect).unwrap();
        assert_eq!(json["destination"]["route"], "product_detail");
        assert_eq!(json["destination"]["slug"], "ferris-mug");
        assert_eq!(json["location"], "/api/products/ferris-mug");
    }
}
