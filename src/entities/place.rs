use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub title: String,
    pub image: Image,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
}

impl Place {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image: Image,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image,
            lat,
            lon,
        }
    }
}

#[test]
fn place_wire_format() {
    let raw = r#"{"id":"p7","title":"Northern Lights","image":{"src":"northern-lights.jpg","alt":"Dazzling display of the Northern Lights in a starry sky."},"lat":64.9631,"lon":-19.0208}"#;

    let place: Place = serde_json::from_str(raw).unwrap();
    assert_eq!(place.id, "p7");
    assert_eq!(place.image.src, "northern-lights.jpg");

    assert_eq!(serde_json::to_string(&place).unwrap(), raw);
}
