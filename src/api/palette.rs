use axum::{extract::State, response::Json};
use pixnum_engine::Palette;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// One palette color
#[derive(Debug, Serialize, ToSchema)]
pub struct PaletteColor {
    /// Palette index, the number printed on the cells
    pub index: u8,
    /// Color used to match source pixels (`#RRGGBB`)
    pub reference: String,
    /// Color shown to the player (`#RRGGBB`)
    pub display: String,
}

/// The active palette in selector order
#[derive(Debug, Serialize, ToSchema)]
pub struct PaletteResponse {
    pub colors: Vec<PaletteColor>,
}

impl From<&Palette> for PaletteResponse {
    fn from(palette: &Palette) -> Self {
        Self {
            colors: palette
                .entries()
                .iter()
                .map(|e| PaletteColor {
                    index: e.index,
                    reference: e.reference.to_hex(),
                    display: e.display.to_hex(),
                })
                .collect(),
        }
    }
}

/// Get the active palette
#[utoipa::path(
    get,
    path = "/api/palette",
    responses(
        (status = 200, description = "Active palette", body = PaletteResponse),
    ),
    tag = "Palette"
)]
pub async fn handle_palette(State(palette): State<Arc<Palette>>) -> Json<PaletteResponse> {
    Json(PaletteResponse::from(palette.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_palette_response_uses_hex() {
        let palette = Palette::from_hex(&[(1, "#808080", Some("#999999")), (9, "#000", None)]).unwrap();
        let response = PaletteResponse::from(&palette);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "colors": [
                    {"index": 1, "reference": "#808080", "display": "#999999"},
                    {"index": 9, "reference": "#000000", "display": "#000000"},
                ]
            })
        );
    }
}
