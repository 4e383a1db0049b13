use crate::shader::UniformKind;

/// Invalid `SurfaceConfig` values, reported before any GPU work starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("pixel ratio cap must be positive and finite, got {0}")]
    PixelRatioCap(f64),
    #[error("time step must be positive and finite, got {0}")]
    TimeStep(f32),
    #[error("field of view must be within (0, 180) degrees, got {0}")]
    FieldOfView(f32),
    #[error("camera distance must be positive and finite, got {0}")]
    CameraDistance(f32),
    #[error("tilt gain must be finite, got {0}")]
    TiltGain(f32),
}

/// Problems with a shader program descriptor or a uniform write.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProgramError {
    #[error("uniform declared twice: {0}")]
    DuplicateUniform(String),
    #[error("uniform with empty name")]
    EmptyUniformName,
    #[error("uniform `{name}` ({kind}) is not declared in any shader stage")]
    UndeclaredUniform { name: String, kind: UniformKind },
    #[error("unknown uniform: {0}")]
    UnknownUniform(String),
    #[error("uniform `{name}` expects {expected}, got {actual}")]
    UniformKindMismatch {
        name: String,
        expected: UniformKind,
        actual: UniformKind,
    },
}

/// Failures while mounting or driving a card render surface.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("webgl2 render context unavailable")]
    RenderContextUnavailable,
    #[error("shader compile failed ({stage}): {log}")]
    ShaderCompile { stage: &'static str, log: String },
    #[error("program link failed: {0}")]
    ProgramLink(String),
    #[error("gpu allocation failed: {0}")]
    Allocation(&'static str),
    #[error("invalid program: {0}")]
    Program(#[from] ProgramError),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("dom error: {0}")]
    Dom(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for SurfaceError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        let msg = value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}"));
        SurfaceError::Dom(msg)
    }
}

#[cfg(target_arch = "wasm32")]
impl From<SurfaceError> for wasm_bindgen::JsValue {
    fn from(err: SurfaceError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
