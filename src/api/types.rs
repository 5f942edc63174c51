//! API 相关类型定义

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::badge::BadgeOverrides;

/// 徽章查询参数
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BadgeQuery {
    /// State filter for issues / pull requests, in the provider's own
    /// vocabulary (e.g. `open` on GitHub, `opened` on GitLab).
    pub state: Option<String>,
    /// Overrides the status background color.
    pub color: Option<String>,
    /// Replaces the computed status text.
    pub status: Option<String>,
    /// Replaces the computed subject label.
    pub subject: Option<String>,
    /// Icon name passed through to the renderer.
    pub icon: Option<String>,
    /// Badge style: flat, flat-square, plastic, social or for-the-badge.
    pub style: Option<String>,
}

impl BadgeQuery {
    pub fn overrides(&self) -> BadgeOverrides {
        BadgeOverrides {
            color: self.color.clone(),
            status: self.status.clone(),
            subject: self.subject.clone(),
            icon: self.icon.clone(),
            style: self.style.clone(),
        }
    }
}

/// 应用信息结构体
#[derive(Serialize, ToSchema)]
pub struct AppInfo {
    pub project_name: String,
    pub version: String,
    pub docs_path: String,
}
