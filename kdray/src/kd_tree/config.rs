use crate::Config;

/// Parameters of the k-d tree construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KdTreeConfig {
    /// Nodes with at most this many primitives are never split.
    pub max_prims_in_node: u32,

    /// Nodes deeper than this are never split; zero means "derive from the
    /// number of primitives", see [`Self::max_depth_for()`].
    pub max_recursion_depth: u32,

    /// Estimated cost of visiting an interior node.
    pub traversal_cost: f32,

    /// Estimated cost of intersecting a single primitive.
    pub intersect_cost: f32,

    /// Discount (`0.0 ..= 1.0`) applied to splits that leave one of the sides
    /// empty.
    pub empty_bonus: f32,

    /// After this many splits worse than not splitting at all (counted along
    /// a path from the root), the node is turned into a leaf.
    pub bad_refine_limit: u32,

    /// A split costing more than this many times the no-split cost is
    /// rejected for nodes small enough to be leaves.
    pub bad_cost_ratio: f32,
}

impl KdTreeConfig {
    pub fn with_max_prims_in_node(mut self, value: u32) -> Self {
        self.max_prims_in_node = value;
        self
    }

    pub fn with_max_recursion_depth(mut self, value: u32) -> Self {
        self.max_recursion_depth = value;
        self
    }

    pub fn with_traversal_cost(mut self, value: f32) -> Self {
        self.traversal_cost = value;
        self
    }

    pub fn with_intersect_cost(mut self, value: f32) -> Self {
        self.intersect_cost = value;
        self
    }

    pub fn with_empty_bonus(mut self, value: f32) -> Self {
        self.empty_bonus = value;
        self
    }

    pub fn with_bad_refine_limit(mut self, value: u32) -> Self {
        self.bad_refine_limit = value;
        self
    }

    pub fn with_bad_cost_ratio(mut self, value: f32) -> Self {
        self.bad_cost_ratio = value;
        self
    }

    /// Reads the `KDTree.*` keys from given config; missing or malformed
    /// entries fall back to their defaults.
    pub fn from_config(config: &Config) -> Self {
        let default = Self::default();

        Self {
            max_prims_in_node: read_u32(
                config,
                "KDTree.MaxPrimsInNode",
                default.max_prims_in_node,
                0,
            ),

            max_recursion_depth: read_u32(
                config,
                "KDTree.MaxRecursionDepth",
                default.max_recursion_depth,
                0,
            ),

            traversal_cost: read_f32(
                config,
                "KDTree.SAH.TraversalCost",
                default.traversal_cost,
                |value| value >= 0.0,
            ),

            intersect_cost: read_f32(
                config,
                "KDTree.SAH.IntersectCost",
                default.intersect_cost,
                |value| value >= 0.0,
            ),

            empty_bonus: read_f32(
                config,
                "KDTree.SAH.EmptyBonus",
                default.empty_bonus,
                |value| (0.0..=1.0).contains(&value),
            ),

            bad_refine_limit: read_u32(
                config,
                "KDTree.SAH.BadRefineLimit",
                default.bad_refine_limit,
                1,
            ),

            bad_cost_ratio: read_f32(
                config,
                "KDTree.SAH.BadCostRatio",
                default.bad_cost_ratio,
                |value| value > 0.0,
            ),
        }
    }

    /// Returns the maximum recursion depth for a tree of given size.
    pub fn max_depth_for(&self, primitive_count: usize) -> u32 {
        if self.max_recursion_depth > 0 {
            return self.max_recursion_depth;
        }

        if primitive_count == 0 {
            return 8;
        }

        8 + (1.3 * (primitive_count as f32).log2()).round() as u32
    }
}

impl Default for KdTreeConfig {
    fn default() -> Self {
        Self {
            max_prims_in_node: 8,
            max_recursion_depth: 0,
            traversal_cost: 1.0,
            intersect_cost: 80.0,
            empty_bonus: 0.5,
            bad_refine_limit: 3,
            bad_cost_ratio: 4.0,
        }
    }
}

fn read_u32(config: &Config, key: &str, default: u32, min: u32) -> u32 {
    match config.get_int(key).map(u32::try_from) {
        Some(Ok(value)) if value >= min => value,

        Some(_) => {
            log::warn!(
                "Config key `{}` is not an integer >= {}; using default {}",
                key,
                min,
                default,
            );

            default
        }

        None => {
            report_missing(config, key, default);
            default
        }
    }
}

fn read_f32(
    config: &Config,
    key: &str,
    default: f32,
    is_valid: impl Fn(f32) -> bool,
) -> f32 {
    match config.get_float(key) {
        Some(value) if value.is_finite() && is_valid(value) => value,

        Some(value) => {
            log::warn!(
                "Config key `{}` has invalid value {}; using default value {}",
                key,
                value,
                default,
            );

            default
        }

        None => {
            report_missing(config, key, default);
            default
        }
    }
}

fn report_missing(
    config: &Config,
    key: &str,
    default: impl std::fmt::Display,
) {
    if config.get(key).is_some() {
        log::warn!(
            "Config key `{}` has unexpected type; using default value {}",
            key,
            default,
        );
    } else {
        log::log!(
            missing_key_level(key),
            "Config key `{}` is missing; using default value {}",
            key,
            default,
        );
    }
}

/// Keys absent from configs written for other tracers.
const EXTENSION_KEYS: [&str; 2] =
    ["KDTree.SAH.BadRefineLimit", "KDTree.SAH.BadCostRatio"];

fn missing_key_level(key: &str) -> log::Level {
    if EXTENSION_KEYS.contains(&key) {
        log::Level::Debug
    } else {
        log::Level::Warn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigValue;

    #[test]
    fn from_config() {
        let config = Config::parse(
            r#"
            KDTree
            {
                MaxPrimsInNode = 4
                MaxRecursionDepth = 20

                SAH
                {
                    TraversalCost = 2
                    IntersectCost = 40.5
                    EmptyBonus = 0.25
                    BadRefineLimit = 5
                    BadCostRatio = 2
                }
            }
            "#,
        )
        .unwrap();

        let expected = KdTreeConfig {
            max_prims_in_node: 4,
            max_recursion_depth: 20,
            traversal_cost: 2.0,
            intersect_cost: 40.5,
            empty_bonus: 0.25,
            bad_refine_limit: 5,
            bad_cost_ratio: 2.0,
        };

        assert_eq!(expected, KdTreeConfig::from_config(&config));
    }

    #[test]
    fn from_config_with_fallbacks() {
        let mut config = Config::default();

        config.set("KDTree.MaxPrimsInNode", ConfigValue::Int(-4));
        config.set("KDTree.MaxRecursionDepth", ConfigValue::Str("deep".into()));
        config.set("KDTree.SAH.EmptyBonus", ConfigValue::Float(1.5));
        config.set("KDTree.SAH.IntersectCost", ConfigValue::Int(20));
        config.set("KDTree.SAH.BadRefineLimit", ConfigValue::Int(0));

        let expected = KdTreeConfig::default().with_intersect_cost(20.0);

        assert_eq!(expected, KdTreeConfig::from_config(&config));
    }

    #[test]
    fn missing_key_levels() {
        assert_eq!(
            log::Level::Warn,
            super::missing_key_level("KDTree.MaxPrimsInNode")
        );

        assert_eq!(
            log::Level::Warn,
            super::missing_key_level("KDTree.SAH.EmptyBonus")
        );

        assert_eq!(
            log::Level::Debug,
            super::missing_key_level("KDTree.SAH.BadRefineLimit")
        );

        assert_eq!(
            log::Level::Debug,
            super::missing_key_level("KDTree.SAH.BadCostRatio")
        );
    }

    #[test]
    fn max_depth_for() {
        let target = KdTreeConfig::default();

        assert_eq!(8, target.max_depth_for(0));
        assert_eq!(8, target.max_depth_for(1));
        assert_eq!(9, target.max_depth_for(2));
        assert_eq!(21, target.max_depth_for(1000));
        assert_eq!(34, target.max_depth_for(1 << 20));

        let target = target.with_max_recursion_depth(5);

        assert_eq!(5, target.max_depth_for(1 << 20));
    }
}
