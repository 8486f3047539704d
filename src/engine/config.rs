//! ### English
//! Process configuration read from the environment (no command-line flags).
//!
//! Invalid values fall back to the defaults with a warning.
//!
//! ### 中文
//! 从环境变量读取的进程配置（不使用命令行参数）。
//!
//! 无效值会回退为默认值并输出警告。

use dpi::PhysicalSize;

use super::shell::ShellKind;
use super::synth::{EscapeTime, Gradient, Pattern};

pub const ENV_PATTERN: &str = "SHM_PRESENT_PATTERN";
pub const ENV_SHELL: &str = "SHM_PRESENT_SHELL";
pub const ENV_WIDTH: &str = "SHM_PRESENT_WIDTH";
pub const ENV_HEIGHT: &str = "SHM_PRESENT_HEIGHT";
pub const ENV_TITLE: &str = "SHM_PRESENT_TITLE";

/// ### English
/// Initial window size (also the fallback display size when no output mode is known).
///
/// ### 中文
/// 初始窗口尺寸（在未知 output mode 时也作为显示器尺寸的兜底值）。
pub const DEFAULT_SIZE: PhysicalSize<u32> = PhysicalSize::new(640, 480);
pub const MIN_SIZE: PhysicalSize<u32> = PhysicalSize::new(32, 32);
pub const DEFAULT_TITLE: &str = "Hello wayland!";

/// ### English
/// Which pixel synthesizer renders the window.
///
/// ### 中文
/// 用于渲染窗口的像素合成器。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PatternKind {
    #[default]
    Fractal,
    Gradient,
}

impl PatternKind {
    pub fn synthesizer(self) -> Pattern {
        match self {
            PatternKind::Fractal => Pattern::EscapeTime(EscapeTime::default()),
            PatternKind::Gradient => Pattern::Gradient(Gradient::default()),
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fractal" | "mandelbrot" | "escape-time" => Some(PatternKind::Fractal),
            "gradient" => Some(PatternKind::Gradient),
            _ => None,
        }
    }
}

/// ### English
/// Shell selection policy at window creation.
///
/// ### 中文
/// 窗口创建时的 shell 选择策略。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ShellPreference {
    /// ### English
    /// Modern if advertised, otherwise legacy.
    ///
    /// ### 中文
    /// 若合成器提供则使用 modern，否则使用 legacy。
    #[default]
    Auto,
    Only(ShellKind),
}

impl ShellPreference {
    /// ### English
    /// Picks the shell to use given what the compositor advertises.
    ///
    /// ### 中文
    /// 根据合成器提供的能力选出要使用的 shell。
    pub fn choose(self, has_legacy: bool, has_modern: bool) -> Option<ShellKind> {
        match self {
            ShellPreference::Auto if has_modern => Some(ShellKind::ModernShellSurface),
            ShellPreference::Auto if has_legacy => Some(ShellKind::LegacyShellSurface),
            ShellPreference::Auto => None,
            ShellPreference::Only(ShellKind::ModernShellSurface) => {
                has_modern.then_some(ShellKind::ModernShellSurface)
            }
            ShellPreference::Only(ShellKind::LegacyShellSurface) => {
                has_legacy.then_some(ShellKind::LegacyShellSurface)
            }
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(ShellPreference::Auto),
            "legacy" | "wl_shell" => Some(ShellPreference::Only(ShellKind::LegacyShellSurface)),
            "modern" | "xdg" | "xdg_shell" => {
                Some(ShellPreference::Only(ShellKind::ModernShellSurface))
            }
            _ => None,
        }
    }
}

/// ### English
/// Runtime configuration of the client.
///
/// ### 中文
/// 客户端的运行时配置。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresentConfig {
    pub pattern: PatternKind,
    pub shell: ShellPreference,
    /// ### English
    /// Initial desired window size (clamped to the display once it is known).
    ///
    /// ### 中文
    /// 初始期望窗口尺寸（获知显示器尺寸后会被钳制）。
    pub initial_size: PhysicalSize<u32>,
    pub min_size: PhysicalSize<u32>,
    pub title: String,
}

impl Default for PresentConfig {
    fn default() -> Self {
        Self {
            pattern: PatternKind::default(),
            shell: ShellPreference::default(),
            initial_size: DEFAULT_SIZE,
            min_size: MIN_SIZE,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl PresentConfig {
    /// ### English
    /// Reads the configuration from the process environment.
    ///
    /// ### 中文
    /// 从进程环境变量读取配置。
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// ### English
    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// #### Parameters
    /// - `lookup`: Returns the raw value of a variable, or `None` if unset.
    ///
    /// ### 中文
    /// 通过任意键查找函数构建配置。
    ///
    /// #### 参数
    /// - `lookup`：返回变量的原始值；未设置时返回 `None`。
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_PATTERN) {
            match PatternKind::parse(&raw) {
                Some(pattern) => config.pattern = pattern,
                None => tracing::warn!(key = ENV_PATTERN, value = %raw, "unknown pattern, using default"),
            }
        }

        if let Some(raw) = lookup(ENV_SHELL) {
            match ShellPreference::parse(&raw) {
                Some(shell) => config.shell = shell,
                None => tracing::warn!(key = ENV_SHELL, value = %raw, "unknown shell, using default"),
            }
        }

        let width = parse_dimension(&lookup, ENV_WIDTH).unwrap_or(DEFAULT_SIZE.width);
        let height = parse_dimension(&lookup, ENV_HEIGHT).unwrap_or(DEFAULT_SIZE.height);
        config.initial_size = PhysicalSize::new(width, height);

        if let Some(title) = lookup(ENV_TITLE).filter(|title| !title.trim().is_empty()) {
            config.title = title;
        }

        config
    }
}

fn parse_dimension<F>(lookup: &F, key: &'static str) -> Option<u32>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            tracing::warn!(key, value = %raw, "invalid dimension, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        assert_eq!(PresentConfig::from_lookup(|_| None), PresentConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = PresentConfig::from_lookup(lookup_from(&[
            (ENV_PATTERN, "Gradient"),
            (ENV_SHELL, "legacy"),
            (ENV_WIDTH, "320"),
            (ENV_HEIGHT, " 240 "),
            (ENV_TITLE, "demo"),
        ]));
        assert_eq!(config.pattern, PatternKind::Gradient);
        assert_eq!(
            config.shell,
            ShellPreference::Only(ShellKind::LegacyShellSurface)
        );
        assert_eq!(config.initial_size, PhysicalSize::new(320, 240));
        assert_eq!(config.title, "demo");
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = PresentConfig::from_lookup(lookup_from(&[
            (ENV_PATTERN, "plasma"),
            (ENV_SHELL, "motif"),
            (ENV_WIDTH, "0"),
            (ENV_HEIGHT, "tall"),
            (ENV_TITLE, "   "),
        ]));
        assert_eq!(config, PresentConfig::default());
    }

    #[test]
    fn shell_preference_choice() {
        assert_eq!(
            ShellPreference::Auto.choose(true, true),
            Some(ShellKind::ModernShellSurface)
        );
        assert_eq!(
            ShellPreference::Auto.choose(true, false),
            Some(ShellKind::LegacyShellSurface)
        );
        assert_eq!(ShellPreference::Auto.choose(false, false), None);
        assert_eq!(
            ShellPreference::Only(ShellKind::LegacyShellSurface).choose(true, true),
            Some(ShellKind::LegacyShellSurface)
        );
        assert_eq!(
            ShellPreference::Only(ShellKind::ModernShellSurface).choose(true, false),
            None
        );
    }
}
