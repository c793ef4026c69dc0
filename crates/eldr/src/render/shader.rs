//! WGSL shader sources and `#include` preprocessing.
//!
//! WGSL has no include mechanism, so shared snippets (the instance transform
//! helper) live in named blocks that [`resolve_includes`] splices in before
//! the module is compiled. Directives look like C's:
//!
//! ```text
//! #include <instance_transform>
//! ```
//!
//! Unknown names and malformed directives are compile-time errors with
//! 1-based line/column positions, so a typo fails at pipeline creation
//! instead of producing a naga parse error three screens away.

use std::collections::HashMap;

use crate::error::IncludeError;

/// Replace every `#include <name>` directive in `source` with the matching
/// snippet from `includes`. The directive may sit anywhere in its line and
/// text on either side of it survives the splice, so a trailing comment is
/// fine. Snippets are spliced verbatim; they are not themselves scanned for
/// directives.
pub fn resolve_includes(
    source: &str,
    includes: &HashMap<String, String>,
) -> Result<String, IncludeError> {
    let mut resolved = String::with_capacity(source.len());

    for (line_index, line) in source.lines().enumerate() {
        let line_number = line_index + 1;

        match line.find("#include") {
            None => resolved.push_str(line),
            Some(pos) => {
                let (start, name, end) = find_directive(line).ok_or_else(|| {
                    IncludeError::MalformedDirective {
                        line: line_number,
                        column: pos + 1,
                        text: line[pos..].to_string(),
                    }
                })?;

                let body = includes
                    .get(name)
                    .ok_or_else(|| IncludeError::MissingInclude {
                        name: name.to_string(),
                        line: line_number,
                        column: start + 1,
                    })?;

                resolved.push_str(&line[..start]);
                resolved.push_str(body);
                resolved.push_str(&line[end..]);
            }
        }
        resolved.push('\n');
    }

    Ok(resolved)
}

/// Find the first complete `#include <name>` in a line. Returns the byte
/// range of the whole directive and the name within it; the name is one or
/// more alphanumeric or underscore characters.
fn find_directive(line: &str) -> Option<(usize, &str, usize)> {
    const OPENER: &str = "#include <";
    let mut search = 0;
    while let Some(offset) = line[search..].find(OPENER) {
        let start = search + offset;
        let after = &line[start + OPENER.len()..];
        let name_len = after
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
            .map_or(after.len(), |(i, _)| i);
        if name_len > 0 && after[name_len..].starts_with('>') {
            let end = start + OPENER.len() + name_len + 1;
            return Some((start, &after[..name_len], end));
        }
        search = start + 1;
    }
    None
}

/// Shared WGSL snippet: applies a column-major 3x3 affine transform to a 2D
/// point already in the instance's local space.
pub const INSTANCE_TRANSFORM_INCLUDE: &str = "\
fn apply_transform(transform: mat3x3<f32>, point: vec2<f32>) -> vec2<f32> {
    let transformed = transform * vec3<f32>(point, 1.0);
    return transformed.xy;
}";

/// Instanced sprite shader. Locations 0-1 are the quad vertex; 2-4 carry the
/// per-instance transform as three mat3x3 columns.
pub const SPRITE_SHADER: &str = "\
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
};

struct InstanceInput {
    @location(2) transform_0: vec3<f32>,
    @location(3) transform_1: vec3<f32>,
    @location(4) transform_2: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

#include <instance_transform>

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let transform = mat3x3<f32>(
        instance.transform_0,
        instance.transform_1,
        instance.transform_2,
    );
    var out: VertexOutput;
    let clip = apply_transform(transform, vertex.position);
    out.clip_position = vec4<f32>(clip, 0.0, 1.0);
    out.uv = vertex.uv;
    return out;
}

@group(0) @binding(0) var sprite_texture: texture_2d<f32>;
@group(0) @binding(1) var sprite_sampler: sampler;

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(sprite_texture, sprite_sampler, in.uv);
}";

/// The sprite shader with all includes resolved, ready for module creation.
pub fn sprite_shader_source() -> Result<String, IncludeError> {
    let mut includes = HashMap::new();
    includes.insert(
        "instance_transform".to_string(),
        INSTANCE_TRANSFORM_INCLUDE.to_string(),
    );
    resolve_includes(SPRITE_SHADER, &includes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn includes(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn directive_is_replaced_verbatim() {
        let source = "before\n#include <snippet>\nafter";
        let resolved = resolve_includes(source, &includes(&[("snippet", "let x = 1.0;")])).unwrap();
        assert_eq!(resolved, "before\nlet x = 1.0;\nafter\n");
    }

    #[test]
    fn indented_directive_keeps_leading_text() {
        let source = "    #include <snippet>";
        let resolved = resolve_includes(source, &includes(&[("snippet", "body")])).unwrap();
        assert_eq!(resolved, "    body\n");
    }

    #[test]
    fn trailing_text_survives_the_splice() {
        let source = "#include <snippet> // shared helper";
        let resolved = resolve_includes(source, &includes(&[("snippet", "body")])).unwrap();
        assert_eq!(resolved, "body // shared helper\n");
    }

    #[test]
    fn directive_without_space_is_malformed() {
        let source = "#include<snippet>";
        let err = resolve_includes(source, &includes(&[("snippet", "body")])).unwrap_err();
        assert!(matches!(err, IncludeError::MalformedDirective { line: 1, column: 1, .. }));
    }

    #[test]
    fn missing_include_reports_name_and_position() {
        let source = "line one\n  #include <nope>";
        let err = resolve_includes(source, &HashMap::new()).unwrap_err();
        match err {
            IncludeError::MissingInclude { name, line, column } => {
                assert_eq!(name, "nope");
                assert_eq!(line, 2);
                assert_eq!(column, 3);
            }
            other => panic!("wrong error: {other}"),
        }
    }

    #[test]
    fn unterminated_directive_is_malformed() {
        let source = "#include <broken";
        let err = resolve_includes(source, &includes(&[("broken", "x")])).unwrap_err();
        assert!(matches!(err, IncludeError::MalformedDirective { line: 1, column: 1, .. }));
    }

    #[test]
    fn bad_name_characters_are_malformed() {
        let source = "#include <has space>";
        let err = resolve_includes(source, &HashMap::new()).unwrap_err();
        assert!(matches!(err, IncludeError::MalformedDirective { .. }));
    }

    #[test]
    fn sprite_shader_resolves() {
        let resolved = sprite_shader_source().unwrap();
        assert!(!resolved.contains("#include"));
        assert!(resolved.contains("fn apply_transform"));
        assert!(resolved.contains("fn vs_main"));
        assert!(resolved.contains("fn fs_main"));
    }
}
