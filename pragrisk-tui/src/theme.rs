//! SynthBrute theme and color utilities.

use crate::notifications::NotificationLevel;
use pragrisk_core::{MitigationStatus, TechStack};
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct SynthBruteTheme {
    pub bg: Color,
    pub bg_secondary: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub secondary: Color,
    pub tertiary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl SynthBruteTheme {
    pub fn synthbrute() -> Self {
        Self {
            bg: Color::Rgb(10, 10, 10),
            bg_secondary: Color::Rgb(26, 26, 26),
            bg_highlight: Color::Rgb(42, 42, 42),
            primary: Color::Rgb(0, 255, 255),
            primary_dim: Color::Rgb(0, 136, 136),
            secondary: Color::Rgb(255, 0, 255),
            tertiary: Color::Rgb(255, 255, 0),
            success: Color::Rgb(0, 255, 0),
            warning: Color::Rgb(255, 255, 0),
            error: Color::Rgb(255, 0, 0),
            info: Color::Rgb(0, 255, 255),
            text: Color::Rgb(255, 255, 255),
            text_dim: Color::Rgb(136, 136, 136),
            text_muted: Color::Rgb(68, 68, 68),
            border: Color::Rgb(68, 68, 68),
            border_focus: Color::Rgb(0, 255, 255),
        }
    }
}

/// Maturity ladder from missing (red) to continuously improved (green).
pub fn mitigation_status_color(status: MitigationStatus, theme: &SynthBruteTheme) -> Color {
    match status {
        MitigationStatus::NotPerformed => theme.error,
        MitigationStatus::AdHoc => theme.warning,
        MitigationStatus::Repeatable => theme.tertiary,
        MitigationStatus::Defined => theme.primary_dim,
        MitigationStatus::Measured => theme.primary,
        MitigationStatus::Continuous => theme.success,
    }
}

pub fn risk_value_color(risk: f64, theme: &SynthBruteTheme) -> Color {
    if risk < 4.0 {
        theme.success
    } else if risk < 10.0 {
        theme.warning
    } else {
        theme.error
    }
}

pub fn tech_stack_color(stack: TechStack, theme: &SynthBruteTheme) -> Color {
    match stack {
        TechStack::Java => theme.tertiary,
        TechStack::DotNet => theme.secondary,
        TechStack::Php => theme.primary,
    }
}

pub fn notification_color(level: NotificationLevel, theme: &SynthBruteTheme) -> Color {
    match level {
        NotificationLevel::Info => theme.info,
        NotificationLevel::Warning => theme.warning,
        NotificationLevel::Error => theme.error,
        NotificationLevel::Success => theme.success,
    }
}
