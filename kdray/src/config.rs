use std::path::Path;
use std::{fs, io};

use fxhash::FxHashMap;
use glam::Vec4;
use thiserror::Error;

/// Key-value settings, read from a block-structured text format:
///
/// ```text
/// // comment
/// KDTree
/// {
///     MaxPrimsInNode = 8
///
///     SAH
///     {
///         EmptyBonus = 0.5
///     }
/// }
/// ```
///
/// Blocks prefix the keys defined inside of them, so the example above
/// defines `KDTree.MaxPrimsInNode` and `KDTree.SAH.EmptyBonus`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    values: FxHashMap<String, ConfigValue>,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        log::debug!("Loading config from `{}`", path.display());

        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn parse(src: &str) -> Result<Self, ConfigError> {
        let mut this = Self::default();
        let mut blocks: Vec<(String, usize)> = Vec::new();

        for (line_idx, line) in src.lines().enumerate() {
            let line_no = line_idx + 1;
            let line = line.trim();

            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key: String = blocks
                    .iter()
                    .map(|(block, _)| block.as_str())
                    .chain([key.trim()])
                    .collect::<Vec<_>>()
                    .join(".");

                let value = ConfigValue::parse(value.trim()).ok_or_else(|| {
                    ConfigError::InvalidValue {
                        line: line_no,
                        value: value.trim().into(),
                    }
                })?;

                if this.values.contains_key(&key) {
                    return Err(ConfigError::DuplicateKey {
                        line: line_no,
                        key,
                    });
                }

                this.values.insert(key, value);
                continue;
            }

            if line == "}" {
                if blocks.pop().is_none() {
                    return Err(ConfigError::UnbalancedBlock { line: line_no });
                }

                continue;
            }

            if line == "{" {
                continue;
            }

            // Allow for `Block {` as a shorthand
            let name = line.strip_suffix('{').unwrap_or(line).trim();

            blocks.push((name.into(), line_no));
        }

        if let Some((name, line)) = blocks.pop() {
            return Err(ConfigError::UnclosedBlock { line, name });
        }

        Ok(this)
    }

    pub fn set(&mut self, key: impl Into<String>, value: ConfigValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.get(key)? {
            ConfigValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns given float; integers get promoted.
    pub fn get_float(&self, key: &str) -> Option<f32> {
        match self.get(key)? {
            ConfigValue::Int(value) => Some(*value as f32),
            ConfigValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            ConfigValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_vec4(&self, key: &str) -> Option<Vec4> {
        match self.get(key)? {
            ConfigValue::Vec4(value) => Some(*value),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    Int(i32),
    Float(f32),
    Str(String),
    Vec4(Vec4),
}

impl ConfigValue {
    fn parse(value: &str) -> Option<Self> {
        if let Ok(value) = value.parse() {
            return Some(Self::Int(value));
        }

        if let Ok(value) = value.parse() {
            return Some(Self::Float(value));
        }

        for quote in ['"', '\''] {
            if let Some(value) = value
                .strip_prefix(quote)
                .and_then(|value| value.strip_suffix(quote))
            {
                return Some(Self::Str(value.into()));
            }
        }

        let components = value
            .strip_prefix('(')?
            .strip_suffix(')')?
            .split(',')
            .map(|component| component.trim().parse().ok())
            .collect::<Option<Vec<f32>>>()?;

        let components: [f32; 4] = components.try_into().ok()?;

        Some(Self::Vec4(Vec4::from_array(components)))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't read config: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: found `}}` outside of any block")]
    UnbalancedBlock { line: usize },

    #[error("line {line}: block `{name}` is never closed")]
    UnclosedBlock { line: usize, name: String },

    #[error("line {line}: key `{key}` is defined more than once")]
    DuplicateKey { line: usize, key: String },

    #[error("line {line}: couldn't parse value `{value}`")]
    InvalidValue { line: usize, value: String },
}

#[cfg(test)]
mod tests {
    use glam::vec4;

    use super::*;

    const CONFIG: &str = r#"
        // Acceleration structure
        KDTree
        {
            MaxPrimsInNode = 8
            MaxRecursionDepth = 0

            SAH
            {
                TraversalCost = 1
                IntersectCost = 80
                EmptyBonus = 0.5
            }
        }

        Camera {
            Name = "main"
            Position = (1.0, 2.5, -3, 1)
        }

        Exposure = 1.5e1
    "#;

    #[test]
    fn parse() {
        let target = Config::parse(CONFIG).unwrap();

        assert_eq!(8, target.len());
        assert_eq!(Some(8), target.get_int("KDTree.MaxPrimsInNode"));
        assert_eq!(Some(0), target.get_int("KDTree.MaxRecursionDepth"));
        assert_eq!(Some(80), target.get_int("KDTree.SAH.IntersectCost"));
        assert_eq!(Some(0.5), target.get_float("KDTree.SAH.EmptyBonus"));
        assert_eq!(Some("main"), target.get_str("Camera.Name"));
        assert_eq!(Some(15.0), target.get_float("Exposure"));

        assert_eq!(
            Some(vec4(1.0, 2.5, -3.0, 1.0)),
            target.get_vec4("Camera.Position"),
        );
    }

    #[test]
    fn typed_getters() {
        let target = Config::parse(CONFIG).unwrap();

        // Ints get promoted to floats, but not the other way around
        assert_eq!(Some(1.0), target.get_float("KDTree.SAH.TraversalCost"));
        assert_eq!(None, target.get_int("KDTree.SAH.EmptyBonus"));
        assert_eq!(None, target.get_str("KDTree.MaxPrimsInNode"));
        assert_eq!(None, target.get_int("KDTree.Unknown"));
    }

    #[test]
    fn errors() {
        let target = Config::parse("A\n{\n}\n}\n").unwrap_err();

        assert!(matches!(target, ConfigError::UnbalancedBlock { line: 4 }));

        let target = Config::parse("A\n{\nB = 1\n").unwrap_err();

        assert!(matches!(
            target,
            ConfigError::UnclosedBlock { line: 1, ref name } if name == "A"
        ));

        let target = Config::parse("A = 1\nA = 2\n").unwrap_err();

        assert!(matches!(
            target,
            ConfigError::DuplicateKey { line: 2, ref key } if key == "A"
        ));

        let target = Config::parse("A = (1, 2)\n").unwrap_err();

        assert_eq!("line 1: couldn't parse value `(1, 2)`", target.to_string());
    }

    #[test]
    fn load_missing_file() {
        let target = Config::load("/definitely/not/a/config.cfg").unwrap_err();

        assert!(matches!(target, ConfigError::Io(_)));
    }
}
