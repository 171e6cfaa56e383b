use serde::Deserialize;
use std::path::Path;

/// One frame to render: a preset scene id, the output size and destination,
/// and optional overrides for scene properties that vary per shot.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrameConfig {
    pub width: u32,
    pub height: u32,
    pub output_path: String,
    pub scene: String,
    pub max_depth: Option<u32>,
    #[serde(default)]
    pub debug_normals: bool,
    #[serde(default)]
    pub debug_depth: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderBatchConfig {
    pub frames: Vec<RenderFrameConfig>,
}

/// Accepts either a bare frame object or a `{ "frames": [...] }` batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IncomingConfig {
    Single(RenderFrameConfig),
    Batch(RenderBatchConfig),
}

impl IncomingConfig {
    pub fn into_frames(self) -> Vec<RenderFrameConfig> {
        match self {
            IncomingConfig::Single(frame) => vec![frame],
            IncomingConfig::Batch(batch) => batch.frames,
        }
    }
}

pub fn validate_config(config: &RenderFrameConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.width == 0 || config.height == 0 {
        return Err("width and height must be positive".into());
    }

    let output_parent = Path::new(&config.output_path)
        .parent()
        .ok_or("outputPath must include a parent directory")?;

    if !output_parent.as_os_str().is_empty() && !output_parent.exists() {
        return Err(format!(
            "output directory does not exist: {}",
            output_parent.display()
        )
        .into());
    }

    if config.scene.trim().is_empty() {
        return Err("scene must be a non-empty identifier".into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_single_frame() {
        let raw = r#"{
            "width": 640,
            "height": 480,
            "outputPath": "out.png",
            "scene": "hollow_die",
            "maxDepth": 6
        }"#;
        let incoming: IncomingConfig = serde_json::from_str(raw).unwrap();
        let frames = incoming.into_frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].scene, "hollow_die");
        assert_eq!(frames[0].max_depth, Some(6));
        assert!(!frames[0].debug_normals);
    }

    #[test]
    fn parses_a_batch() {
        let raw = r#"{
            "frames": [
                { "width": 64, "height": 64, "outputPath": "a.png", "scene": "sphere_phong" },
                { "width": 64, "height": 64, "outputPath": "b.png", "scene": "triangles",
                  "debugNormals": true }
            ]
        }"#;
        let incoming: IncomingConfig = serde_json::from_str(raw).unwrap();
        let frames = incoming.into_frames();
        assert_eq!(frames.len(), 2);
        assert!(frames[1].debug_normals);
    }

    #[test]
    fn rejects_a_zero_sized_frame() {
        let config = RenderFrameConfig {
            width: 0,
            height: 64,
            output_path: "out.png".into(),
            scene: "triangles".into(),
            max_depth: None,
            debug_normals: false,
            debug_depth: false,
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_an_empty_scene_id() {
        let config = RenderFrameConfig {
            width: 64,
            height: 64,
            output_path: "out.png".into(),
            scene: "  ".into(),
            max_depth: None,
            debug_normals: false,
            debug_depth: false,
        };
        assert!(validate_config(&config).is_err());
    }
}
