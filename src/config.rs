//! Application configuration.
//!
//! Everything has a code default and can be overridden through the
//! environment:
//!
//! | variable               | meaning                               | default   |
//! |------------------------|---------------------------------------|-----------|
//! | `STENCIL_CUBE_ASSETS`  | root directory (or URL path) of models | `assets`  |
//! | `STENCIL_CUBE_VARIANT` | `full` or `demo`                      | `full`    |
//! | `STENCIL_CUBE_SEED`    | seed of the animation RNG             | entropy   |
//!
//! On wasm32 the environment is empty and the defaults apply.

use std::str::FromStr;

use rand::{SeedableRng, rngs::StdRng};

use crate::scene::config::SceneConfig;

pub const ASSETS_VAR: &str = "STENCIL_CUBE_ASSETS";
pub const VARIANT_VAR: &str = "STENCIL_CUBE_VARIANT";
pub const SEED_VAR: &str = "STENCIL_CUBE_SEED";

/// Which set of face pieces to load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Variant {
    #[default]
    Full,
    /// Fewer pieces on the busy faces, same animation rules.
    Demo,
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Variant::Full),
            "demo" => Ok(Variant::Demo),
            other => anyhow::bail!("unknown scene variant {:?}, expected full or demo", other),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub asset_root: String,
    pub variant: Variant,
    /// `None` seeds from entropy.
    pub seed: Option<u64>,
    pub clear_colour: wgpu::Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            asset_root: "assets".to_string(),
            variant: Variant::Full,
            seed: None,
            clear_colour: wgpu::Color {
                r: 0.02,
                g: 0.02,
                b: 0.04,
                a: 1.0,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Invalid values are
    /// logged and replaced by their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(root) = lookup(ASSETS_VAR).filter(|r| !r.is_empty()) {
            config.asset_root = root;
        }
        if let Some(variant) = lookup(VARIANT_VAR) {
            match variant.parse() {
                Ok(variant) => config.variant = variant,
                Err(e) => log::warn!("{}: {}", VARIANT_VAR, e),
            }
        }
        if let Some(seed) = lookup(SEED_VAR) {
            match seed.trim().parse() {
                Ok(seed) => config.seed = Some(seed),
                Err(e) => log::warn!("{}: ignoring {:?}: {}", SEED_VAR, seed, e),
            }
        }
        config
    }

    pub fn scene_config(&self) -> SceneConfig {
        match self.variant {
            Variant::Full => SceneConfig::full(),
            Variant::Demo => SceneConfig::demo(),
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::Rng;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.asset_root, "assets");
        assert_eq!(config.variant, Variant::Full);
        assert_eq!(config.seed, None);
        assert_eq!(config.scene_config().total_loads(), 99);
    }

    #[test]
    fn reads_all_variables() {
        let config = AppConfig::from_lookup(lookup(&[
            (ASSETS_VAR, "/srv/cube"),
            (VARIANT_VAR, " Demo "),
            (SEED_VAR, "42"),
        ]));
        assert_eq!(config.asset_root, "/srv/cube");
        assert_eq!(config.variant, Variant::Demo);
        assert_eq!(config.seed, Some(42));
        assert!(config.scene_config().total_loads() < 99);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[(VARIANT_VAR, "huge"), (SEED_VAR, "-3")]));
        assert_eq!(config.variant, Variant::Full);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn seeded_rng_repeats() {
        let config = AppConfig {
            seed: Some(7),
            ..Default::default()
        };
        let a: Vec<u32> = (0..8).map(|_| config.rng().gen_range(0..1000)).collect();
        let mut first = config.rng();
        let mut second = config.rng();
        let b: Vec<u32> = (0..8).map(|_| first.gen_range(0..1000)).collect();
        let c: Vec<u32> = (0..8).map(|_| second.gen_range(0..1000)).collect();
        assert_eq!(b, c);
        assert!(a.iter().all(|&x| x == a[0]));
    }
}
