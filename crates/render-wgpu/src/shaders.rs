use lumen_assets::{AssetError, AssetPaths, load_shader_source};

pub const BASIC_VS: &str = "vs_main";
pub const BASIC_FS: &str = "fs_main";
pub const OUTLINE_VS: &str = "vs_outline";
pub const OUTLINE_FS: &str = "fs_outline";
pub const LIGHT_VS: &str = "vs_light";
pub const LIGHT_FS: &str = "fs_light";

/// WGSL sources for the three programs, read once at startup.
#[derive(Debug, Clone)]
pub struct ShaderSet {
    /// Lit, textured cubes.
    pub basic: String,
    /// Flat outline colour.
    pub outline: String,
    /// Unlit light markers.
    pub light: String,
}

impl ShaderSet {
    pub fn load(paths: &AssetPaths) -> Result<Self, AssetError> {
        Ok(Self {
            basic: load_shader_source(paths.shader("basic"))?,
            outline: load_shader_source(paths.shader("outline"))?,
            light: load_shader_source(paths.shader("light"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn repo_assets() -> AssetPaths {
        AssetPaths::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("../../res"))
    }

    #[test]
    fn bundled_shaders_define_entry_points() {
        let set = ShaderSet::load(&repo_assets()).unwrap();
        for (src, entries) in [
            (&set.basic, [BASIC_VS, BASIC_FS]),
            (&set.outline, [OUTLINE_VS, OUTLINE_FS]),
            (&set.light, [LIGHT_VS, LIGHT_FS]),
        ] {
            for entry in entries {
                assert!(src.contains(&format!("fn {entry}(")), "missing {entry}");
            }
        }
    }

    #[test]
    fn lit_shader_declares_four_point_lights() {
        let set = ShaderSet::load(&repo_assets()).unwrap();
        assert!(set.basic.contains("array<PointLight, 4>"));
    }

    #[test]
    fn missing_root_is_reported() {
        let err = ShaderSet::load(&AssetPaths::new("/nonexistent/lumen")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
