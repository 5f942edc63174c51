//! Badge parameter resolution and rendering.
//!
//! The computed subject/status pair is merged with user-supplied query
//! overrides in a fixed order, then handed to the shields renderer.

use utoipa::ToSchema;

use crate::error::{AppError, FetchError};

/// Badge visual styles accepted on the `style` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ToSchema)]
pub enum BadgeStyle {
    #[default]
    Flat,
    FlatSquare,
    Plastic,
    Social,
    ForTheBadge,
}

impl BadgeStyle {
    /// Parse the resolved style string. Empty means the default flat
    /// style; anything unrecognized is a render error.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw {
            "" | "flat" => Ok(BadgeStyle::Flat),
            "flat-square" => Ok(BadgeStyle::FlatSquare),
            "plastic" => Ok(BadgeStyle::Plastic),
            "social" => Ok(BadgeStyle::Social),
            "for-the-badge" => Ok(BadgeStyle::ForTheBadge),
            other => Err(AppError::Render(format!("unsupported badge style: {other}"))),
        }
    }

    fn to_shields(self) -> shields::BadgeStyle {
        match self {
            BadgeStyle::Flat => shields::BadgeStyle::Flat,
            BadgeStyle::FlatSquare => shields::BadgeStyle::FlatSquare,
            BadgeStyle::Plastic => shields::BadgeStyle::Plastic,
            BadgeStyle::Social => shields::BadgeStyle::Social,
            BadgeStyle::ForTheBadge => shields::BadgeStyle::ForTheBadge,
        }
    }
}

/// User-supplied display overrides from the query string.
#[derive(Debug, Default, Clone)]
pub struct BadgeOverrides {
    pub color: Option<String>,
    pub status: Option<String>,
    pub subject: Option<String>,
    pub icon: Option<String>,
    pub style: Option<String>,
}

/// Final display parameters handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBadgeParams {
    pub subject: String,
    pub status: String,
    pub color: String,
    pub icon: String,
    pub style: String,
}

/// Resolve a metric badge: the fetched count (or the fetch error's
/// message) becomes the status text, then overrides are merged on top.
/// An explicit `status=` override can therefore mask a fetch error.
pub fn resolve(
    subject: &str,
    outcome: Result<u64, FetchError>,
    overrides: &BadgeOverrides,
) -> ResolvedBadgeParams {
    let status = match &outcome {
        Ok(count) => count.to_string(),
        Err(err) => err.to_string(),
    };
    let mut params = ResolvedBadgeParams {
        subject: subject.to_string(),
        status,
        color: String::new(),
        icon: String::new(),
        style: String::new(),
    };
    apply_overrides(&mut params, overrides);
    params
}

/// Resolve the `/static` badge: nothing is computed, the query string
/// shapes the whole badge.
pub fn resolve_static(overrides: &BadgeOverrides) -> ResolvedBadgeParams {
    let mut params = ResolvedBadgeParams {
        subject: String::new(),
        status: String::new(),
        color: String::new(),
        icon: String::new(),
        style: String::new(),
    };
    apply_overrides(&mut params, overrides);
    params
}

/// The override merge, in fixed order. `color`/`status`/`subject` only
/// replace the computed value when non-empty; `icon`/`style` are taken
/// whenever the parameter is present, empty included.
fn apply_overrides(params: &mut ResolvedBadgeParams, overrides: &BadgeOverrides) {
    if let Some(color) = non_empty(&overrides.color) {
        params.color = color.to_string();
    }
    if let Some(status) = non_empty(&overrides.status) {
        params.status = status.to_string();
    }
    if let Some(subject) = non_empty(&overrides.subject) {
        params.subject = subject.to_string();
    }
    if let Some(icon) = &overrides.icon {
        params.icon = icon.clone();
    }
    if let Some(style) = &overrides.style {
        params.style = style.clone();
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Render resolved parameters to SVG markup.
pub fn render(params: &ResolvedBadgeParams) -> Result<String, AppError> {
    let style = BadgeStyle::parse(&params.style)?;
    let message_color = (!params.color.is_empty()).then_some(params.color.as_str());
    let logo = (!params.icon.is_empty()).then_some(params.icon.as_str());
    let svg = shields::render_badge_svg(&shields::BadgeParams {
        style: style.to_shields(),
        label: Some(params.subject.as_str()),
        message: Some(params.status.as_str()),
        label_color: None,
        message_color,
        link: None,
        extra_link: None,
        logo,
        logo_color: None,
    });
    Ok(svg)
}
