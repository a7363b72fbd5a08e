use axum::response::Json;
use photo_restore::Mode;
use serde::Serialize;
use utoipa::ToSchema;

/// A supported restoration mode
#[derive(Debug, Serialize, ToSchema)]
pub struct ModeInfo {
    /// Tag accepted by the `mode` parameter
    pub tag: String,
    /// Human-readable name
    pub label: String,
}

/// Response from the modes listing
#[derive(Debug, Serialize, ToSchema)]
pub struct ModesResponse {
    pub modes: Vec<ModeInfo>,
}

/// List supported modes
///
/// Any other tag is accepted by the enhance endpoints and leaves the image
/// unchanged.
#[utoipa::path(
    get,
    path = "/api/modes",
    responses(
        (status = 200, description = "Supported restoration modes", body = ModesResponse),
    ),
    tag = "Enhance"
)]
pub async fn handle_modes() -> Json<ModesResponse> {
    Json(modes_response())
}

pub fn modes_response() -> ModesResponse {
    ModesResponse {
        modes: Mode::ALL
            .into_iter()
            .map(|m| ModeInfo {
                tag: m.as_str().to_string(),
                label: m.label().to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_response_lists_all_tags() {
        let tags: Vec<String> = modes_response().modes.into_iter().map(|m| m.tag).collect();
        assert_eq!(tags, vec!["low_light", "fog", "smoke"]);
    }
}
