//! 职位搜索条件
//!
//! 配置中的筛选项使用可读名称（如 `full_time`），这里映射为门户网站的查询参数代码。

use phf::phf_map;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConfigError;

/// 经验等级 → `f_E`
static EXPERIENCE_LEVELS: phf::Map<&'static str, &'static str> = phf_map! {
    "internship" => "1",
    "entry" => "2",
    "associate" => "3",
    "mid_senior" => "4",
    "director" => "5",
    "executive" => "6",
};

/// 工作类型 → `f_JT`
static JOB_TYPES: phf::Map<&'static str, &'static str> = phf_map! {
    "full_time" => "F",
    "part_time" => "P",
    "contract" => "C",
    "temporary" => "T",
    "internship" => "I",
    "volunteer" => "V",
    "other" => "O",
};

/// 发布时间 → `f_TPR`
static POSTED_WITHIN: phf::Map<&'static str, &'static str> = phf_map! {
    "day" => "r86400",
    "week" => "r604800",
    "month" => "r2592000",
};

/// 搜索筛选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// 只看可以站内快速申请的职位
    pub easy_apply_only: bool,
    pub experience_levels: Vec<String>,
    pub job_types: Vec<String>,
    pub posted_within: Option<String>,
    /// 原样追加到 URL 的其他参数
    pub extra: BTreeMap<String, String>,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            easy_apply_only: true,
            experience_levels: vec!["internship".to_string()],
            job_types: vec!["full_time".to_string()],
            posted_within: Some("week".to_string()),
            extra: BTreeMap::new(),
        }
    }
}

impl SearchFilters {
    /// 转换为查询参数，遇到未知名称返回错误
    pub fn to_params(&self) -> Result<Vec<(String, String)>, ConfigError> {
        let mut params = Vec::new();

        if self.easy_apply_only {
            params.push(("f_AL".to_string(), "true".to_string()));
        }

        if !self.experience_levels.is_empty() {
            let codes = lookup_all(&EXPERIENCE_LEVELS, "experience_level", &self.experience_levels)?;
            params.push(("f_E".to_string(), codes.join(",")));
        }

        if !self.job_types.is_empty() {
            let codes = lookup_all(&JOB_TYPES, "job_type", &self.job_types)?;
            params.push(("f_JT".to_string(), codes.join(",")));
        }

        if let Some(posted) = &self.posted_within {
            let code = POSTED_WITHIN
                .get(posted.as_str())
                .ok_or_else(|| ConfigError::UnknownFilter {
                    kind: "posted_within",
                    value: posted.clone(),
                })?;
            params.push(("f_TPR".to_string(), code.to_string()));
        }

        for (key, value) in &self.extra {
            params.push((key.clone(), value.clone()));
        }

        Ok(params)
    }
}

fn lookup_all(
    map: &phf::Map<&'static str, &'static str>,
    kind: &'static str,
    names: &[String],
) -> Result<Vec<&'static str>, ConfigError> {
    names
        .iter()
        .map(|name| {
            map.get(name.as_str())
                .copied()
                .ok_or_else(|| ConfigError::UnknownFilter {
                    kind,
                    value: name.clone(),
                })
        })
        .collect()
}

/// 一次搜索会话的查询条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub keywords: String,
    pub location: String,
    pub filters: SearchFilters,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            keywords: "Software Engineer".to_string(),
            location: "United States".to_string(),
            filters: SearchFilters::default(),
        }
    }
}

impl SearchQuery {
    pub fn new(keywords: impl Into<String>, location: impl Into<String>, filters: SearchFilters) -> Self {
        Self {
            keywords: keywords.into(),
            location: location.into(),
            filters,
        }
    }

    /// 第 `page` 页（从 0 开始）的搜索 URL
    pub fn page_url(&self, base_url: &str, page: usize, page_size: usize) -> Result<String, ConfigError> {
        let mut params = vec![
            ("keywords".to_string(), self.keywords.clone()),
            ("location".to_string(), self.location.clone()),
        ];
        params.extend(self.filters.to_params()?);
        params.push(("start".to_string(), (page * page_size).to_string()));

        let url = Url::parse_with_params(base_url, &params).map_err(|e| ConfigError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.linkedin.com/jobs/search/";

    #[test]
    fn test_default_filters_match_portal_codes() {
        let params = SearchFilters::default().to_params().unwrap();
        assert!(params.contains(&("f_AL".to_string(), "true".to_string())));
        assert!(params.contains(&("f_E".to_string(), "1".to_string())));
        assert!(params.contains(&("f_JT".to_string(), "F".to_string())));
        assert!(params.contains(&("f_TPR".to_string(), "r604800".to_string())));
    }

    #[test]
    fn test_multiple_codes_are_comma_joined() {
        let filters = SearchFilters {
            experience_levels: vec!["entry".to_string(), "associate".to_string()],
            job_types: vec!["contract".to_string()],
            posted_within: None,
            ..Default::default()
        };
        let params = filters.to_params().unwrap();
        assert!(params.contains(&("f_E".to_string(), "2,3".to_string())));
        assert!(params.iter().all(|(k, _)| k != "f_TPR"));
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        let filters = SearchFilters {
            job_types: vec!["gig".to_string()],
            ..Default::default()
        };
        let err = filters.to_params().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFilter { kind: "job_type", .. }));
    }

    #[test]
    fn test_page_url_carries_offset() {
        let query = SearchQuery::default();
        let url = query.page_url(BASE, 2, 25).unwrap();

        assert!(url.starts_with(BASE));
        assert!(url.contains("keywords=Software+Engineer"));
        assert!(url.contains("location=United+States"));
        assert!(url.contains("start=50"));

        let first = query.page_url(BASE, 0, 25).unwrap();
        assert!(first.contains("start=0"));
    }

    #[test]
    fn test_page_url_rejects_bad_base() {
        let err = SearchQuery::default().page_url("not a url", 0, 25).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }
}
