//! Structured description of the card's shader program.
//!
//! A [`ProgramDescriptor`] carries both stage sources and the named, typed
//! uniforms they expect. [`ProgramDescriptor::validate`] cross-checks the two
//! so a mismatch shows up at construction, not as a silent no-op upload after
//! the program has linked.

use std::fmt;

use glam::{Mat4, Vec2, Vec3};

use crate::error::ProgramError;
use crate::holo::HoloPalette;

pub const ATTRIB_POSITION: u32 = 0;
pub const ATTRIB_UV: u32 = 1;

pub const U_TIME: &str = "time";
pub const U_MOUSE: &str = "mouse";
pub const U_RESOLUTION: &str = "resolution";
pub const U_COLOR_A: &str = "colorA";
pub const U_COLOR_B: &str = "colorB";
pub const U_COLOR_C: &str = "colorC";
pub const U_MVP: &str = "modelViewProjection";

pub const HOLO_VERTEX: &str = r#"#version 300 es
layout(location = 0) in vec3 position;
layout(location = 1) in vec2 uv;

uniform mat4 modelViewProjection;

out vec2 vUv;

void main() {
    vUv = uv;
    gl_Position = modelViewProjection * vec4(position, 1.0);
}
"#;

// Must stay in step with `holo::shade`.
pub const HOLO_FRAGMENT: &str = r#"#version 300 es
precision highp float;

uniform float time;
uniform vec2 mouse;
uniform vec2 resolution;
uniform vec3 colorA;
uniform vec3 colorB;
uniform vec3 colorC;

in vec2 vUv;
out vec4 fragColor;

void main() {
    vec2 uv = vUv;
    vec3 baseColor = vec3(0.95, 0.96, 1.0);

    float wave1 = sin(uv.x * 10.0 + time * 2.0) * 0.5 + 0.5;
    float wave2 = sin(uv.y * 8.0 + time * 1.5) * 0.5 + 0.5;

    vec2 mouseInfluence = (mouse - 0.5) * 2.0;
    float mouseEffect = 1.0 - clamp(length(mouseInfluence - uv) * 2.0, 0.0, 1.0);

    vec3 hologram = mix(colorA, colorB, wave1);
    hologram = mix(hologram, colorC, wave2);

    vec3 finalColor = mix(baseColor, hologram, 0.3 + mouseEffect * 0.4);

    float shimmer = sin(uv.x * 20.0 + uv.y * 15.0 + time * 3.0) * 0.1 + 0.9;
    finalColor *= shimmer;

    fragColor = vec4(finalColor, 1.0);
}
"#;

/// GLSL type of a uniform.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    Float,
    Vec2,
    Vec3,
    Mat4,
}

impl UniformKind {
    pub fn glsl(self) -> &'static str {
        match self {
            UniformKind::Float => "float",
            UniformKind::Vec2 => "vec2",
            UniformKind::Vec3 => "vec3",
            UniformKind::Mat4 => "mat4",
        }
    }
}

impl fmt::Display for UniformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glsl())
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Mat4(Mat4),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Mat4(_) => UniformKind::Mat4,
        }
    }
}

/// A named uniform and its value at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformDecl {
    pub name: String,
    pub default: UniformValue,
}

impl UniformDecl {
    pub fn new(name: impl Into<String>, default: UniformValue) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramDescriptor {
    pub vertex: String,
    pub fragment: String,
    pub uniforms: Vec<UniformDecl>,
}

impl ProgramDescriptor {
    /// The holographic card program with its uniforms seeded from `palette`
    /// and a `width` x `height` resolution.
    pub fn holographic(palette: &HoloPalette, width: u32, height: u32) -> Self {
        Self {
            vertex: HOLO_VERTEX.to_owned(),
            fragment: HOLO_FRAGMENT.to_owned(),
            uniforms: vec![
                UniformDecl::new(U_TIME, UniformValue::Float(0.0)),
                UniformDecl::new(U_MOUSE, UniformValue::Vec2(Vec2::ZERO)),
                UniformDecl::new(
                    U_RESOLUTION,
                    UniformValue::Vec2(Vec2::new(width as f32, height as f32)),
                ),
                UniformDecl::new(U_COLOR_A, UniformValue::Vec3(palette.color_a)),
                UniformDecl::new(U_COLOR_B, UniformValue::Vec3(palette.color_b)),
                UniformDecl::new(U_COLOR_C, UniformValue::Vec3(palette.color_c)),
                UniformDecl::new(U_MVP, UniformValue::Mat4(Mat4::IDENTITY)),
            ],
        }
    }

    /// Checks that uniform names are unique and non-empty, and that every
    /// declared uniform appears in a stage source with the same GLSL type.
    pub fn validate(&self) -> Result<(), ProgramError> {
        let declared: Vec<(String, String)> = uniform_statements(&self.vertex)
            .chain(uniform_statements(&self.fragment))
            .collect();

        for (i, decl) in self.uniforms.iter().enumerate() {
            if decl.name.is_empty() {
                return Err(ProgramError::EmptyUniformName);
            }
            if self.uniforms[..i].iter().any(|d| d.name == decl.name) {
                return Err(ProgramError::DuplicateUniform(decl.name.clone()));
            }
            let kind = decl.default.kind();
            let found = declared
                .iter()
                .any(|(ty, name)| name == &decl.name && ty == kind.glsl());
            if !found {
                return Err(ProgramError::UndeclaredUniform {
                    name: decl.name.clone(),
                    kind,
                });
            }
        }
        Ok(())
    }
}

/// Yields `(type, name)` for each `uniform` statement in a GLSL source.
fn uniform_statements(src: &str) -> impl Iterator<Item = (String, String)> + '_ {
    src.split(';').filter_map(|stmt| {
        let tokens: Vec<&str> = stmt.split_whitespace().collect();
        let start = tokens.iter().position(|t| *t == "uniform")?;
        let rest = &tokens[start + 1..];
        // precision qualifiers may sit between `uniform` and the type
        match rest {
            [.., ty, name] => Some(((*ty).to_owned(), (*name).to_owned())),
            _ => None,
        }
    })
}

/// Runtime uniform values for one program, keyed by name.
#[derive(Debug, Clone)]
pub struct Uniforms {
    entries: Vec<(String, UniformValue)>,
}

impl Uniforms {
    pub fn from_descriptor(desc: &ProgramDescriptor) -> Self {
        Self {
            entries: desc
                .uniforms
                .iter()
                .map(|d| (d.name.clone(), d.default))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Overwrites a uniform, keeping its declared type.
    pub fn set(&mut self, name: &str, value: UniformValue) -> Result<(), ProgramError> {
        let slot = self
            .entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .ok_or_else(|| ProgramError::UnknownUniform(name.to_owned()))?;
        let expected = slot.1.kind();
        if expected != value.kind() {
            return Err(ProgramError::UniformKindMismatch {
                name: name.to_owned(),
                expected,
                actual: value.kind(),
            });
        }
        slot.1 = value;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holo() -> ProgramDescriptor {
        ProgramDescriptor::holographic(&HoloPalette::default(), 400, 560)
    }

    #[test]
    fn holographic_program_validates() {
        assert_eq!(holo().validate(), Ok(()));
    }

    #[test]
    fn parses_uniforms_with_precision_qualifier() {
        let stmts: Vec<_> = uniform_statements("uniform highp float time;\nuniform vec2 mouse;").collect();
        assert_eq!(
            stmts,
            vec![
                ("float".to_owned(), "time".to_owned()),
                ("vec2".to_owned(), "mouse".to_owned()),
            ]
        );
    }

    #[test]
    fn rejects_uniform_missing_from_sources() {
        let mut desc = holo();
        desc.uniforms
            .push(UniformDecl::new("glow", UniformValue::Float(1.0)));
        assert!(matches!(
            desc.validate(),
            Err(ProgramError::UndeclaredUniform { ref name, .. }) if name == "glow"
        ));
    }

    #[test]
    fn rejects_type_disagreeing_with_source() {
        let mut desc = holo();
        desc.uniforms[0] = UniformDecl::new(U_TIME, UniformValue::Vec2(Vec2::ZERO));
        assert!(matches!(
            desc.validate(),
            Err(ProgramError::UndeclaredUniform { kind: UniformKind::Vec2, .. })
        ));
    }

    #[test]
    fn rejects_duplicates_and_empty_names() {
        let mut desc = holo();
        desc.uniforms
            .push(UniformDecl::new(U_TIME, UniformValue::Float(0.0)));
        assert_eq!(
            desc.validate(),
            Err(ProgramError::DuplicateUniform(U_TIME.to_owned()))
        );

        let mut desc = holo();
        desc.uniforms.insert(0, UniformDecl::new("", UniformValue::Float(0.0)));
        assert_eq!(desc.validate(), Err(ProgramError::EmptyUniformName));
    }

    #[test]
    fn store_enforces_names_and_kinds() {
        let mut u = Uniforms::from_descriptor(&holo());
        assert_eq!(u.len(), 7);
        u.set(U_TIME, UniformValue::Float(1.5)).unwrap();
        assert_eq!(u.get(U_TIME), Some(UniformValue::Float(1.5)));

        assert_eq!(
            u.set("nope", UniformValue::Float(0.0)),
            Err(ProgramError::UnknownUniform("nope".to_owned()))
        );
        assert_eq!(
            u.set(U_MOUSE, UniformValue::Float(0.0)),
            Err(ProgramError::UniformKindMismatch {
                name: U_MOUSE.to_owned(),
                expected: UniformKind::Vec2,
                actual: UniformKind::Float,
            })
        );
    }
}
