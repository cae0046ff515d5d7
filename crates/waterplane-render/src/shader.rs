//! Shader management.

use std::collections::HashSet;

use pollster::FutureExt;

use crate::error::{RenderError, RenderResult};

/// Names the water surface writes to by name every frame.
///
/// Any shader used to draw a water surface must declare all of them.
pub const WATER_SHADER_NAMES: [&str; 9] = [
    "MVP",
    "model",
    "view",
    "projection",
    "viewPos",
    "waveFactor",
    "reflectionTexture",
    "refractionTexture",
    "dudvTexture",
];

/// The bundled water shader (WGSL).
pub const WATER_SHADER_SOURCE: &str = include_str!("shaders/water.wgsl");

/// Builder for creating shader modules.
pub struct ShaderBuilder {
    source: Option<String>,
    vertex_entry: String,
    fragment_entry: String,
    label: Option<String>,
    required_names: Vec<String>,
}

impl ShaderBuilder {
    /// Creates a new shader builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            vertex_entry: "vs_main".to_string(),
            fragment_entry: "fs_main".to_string(),
            label: None,
            required_names: Vec::new(),
        }
    }

    /// Sets the WGSL source holding both entry points.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the vertex shader entry point.
    #[must_use]
    pub fn with_vertex_entry(mut self, entry: impl Into<String>) -> Self {
        self.vertex_entry = entry.into();
        self
    }

    /// Sets the fragment shader entry point.
    #[must_use]
    pub fn with_fragment_entry(mut self, entry: impl Into<String>) -> Self {
        self.fragment_entry = entry.into();
        self
    }

    /// Sets the shader label for debugging.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Adds identifiers the source must declare.
    #[must_use]
    pub fn require_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn vertex_entry(&self) -> &str {
        &self.vertex_entry
    }

    pub fn fragment_entry(&self) -> &str {
        &self.fragment_entry
    }

    /// Required names (and entry points) that the source never mentions.
    pub fn missing_names(&self) -> Vec<String> {
        let identifiers = self.source.as_deref().map(identifiers).unwrap_or_default();
        self.required_names
            .iter()
            .chain([&self.vertex_entry, &self.fragment_entry])
            .filter(|name| !identifiers.contains(name.as_str()))
            .cloned()
            .collect()
    }

    /// Checks the source is present and declares every required name.
    pub fn validate(&self) -> RenderResult<()> {
        if self.source.is_none() {
            return Err(RenderError::ShaderCompilationFailed(
                "missing shader source".into(),
            ));
        }
        let missing = self.missing_names();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RenderError::UnresolvedShaderNames(missing))
        }
    }

    /// Validates and compiles the shader module.
    pub fn build_module(&self, device: &wgpu::Device) -> RenderResult<wgpu::ShaderModule> {
        self.validate()?;
        let source = self.source.as_deref().unwrap_or_default();

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: self.label.as_deref(),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        if let Some(error) = device.pop_error_scope().block_on() {
            return Err(RenderError::ShaderCompilationFailed(error.to_string()));
        }

        Ok(module)
    }
}

impl Default for ShaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Every identifier-like token of a WGSL source, comments excluded.
fn identifiers(source: &str) -> HashSet<&str> {
    let mut tokens = HashSet::new();
    let mut rest = source;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("//") {
            rest = after.find('\n').map_or("", |i| &after[i..]);
            continue;
        }
        if let Some(after) = rest.strip_prefix("/*") {
            rest = after.find("*/").map_or("", |i| &after[i + 2..]);
            continue;
        }

        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len > 0 {
            tokens.insert(&rest[..len]);
            rest = &rest[len..];
        } else {
            let skip = rest.chars().next().map_or(1, char::len_utf8);
            rest = &rest[skip..];
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_shader_declares_names() {
        let builder = ShaderBuilder::new()
            .with_source(WATER_SHADER_SOURCE)
            .require_names(WATER_SHADER_NAMES);
        assert!(builder.missing_names().is_empty());
        assert!(builder.validate().is_ok());
    }

    #[test]
    fn test_reports_missing_names() {
        let source = "struct U { MVP: mat4x4<f32>, model: mat4x4<f32> }\nfn vs_main() {}\nfn fs_main() {}";
        let builder = ShaderBuilder::new()
            .with_source(source)
            .require_names(["MVP", "model", "waveFactor", "viewPos"]);
        assert_eq!(builder.missing_names(), vec!["waveFactor", "viewPos"]);
        match builder.validate() {
            Err(RenderError::UnresolvedShaderNames(names)) => {
                assert_eq!(names, vec!["waveFactor", "viewPos"]);
            }
            other => panic!("expected unresolved names, got {other:?}"),
        }
    }

    #[test]
    fn test_names_in_comments_do_not_count() {
        let source = "// waveFactor\n/* viewPos */ fn vs_main() {} fn fs_main() {}";
        let builder = ShaderBuilder::new()
            .with_source(source)
            .require_names(["waveFactor", "viewPos"]);
        assert_eq!(builder.missing_names().len(), 2);
    }

    #[test]
    fn test_partial_identifier_does_not_match() {
        let source = "var<uniform> modelView: mat4x4<f32>; fn vs_main() {} fn fs_main() {}";
        let builder = ShaderBuilder::new()
            .with_source(source)
            .require_names(["model", "view"]);
        assert_eq!(builder.missing_names(), vec!["model", "view"]);
    }

    #[test]
    fn test_entry_points_required() {
        let builder = ShaderBuilder::new()
            .with_source("fn main() {}")
            .with_vertex_entry("main");
        assert_eq!(builder.missing_names(), vec!["fs_main"]);
    }

    #[test]
    fn test_missing_source() {
        assert!(matches!(
            ShaderBuilder::new().validate(),
            Err(RenderError::ShaderCompilationFailed(_))
        ));
    }
}
