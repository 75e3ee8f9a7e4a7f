//! 职位处理上下文
//!
//! 封装"我正在处理第几页的第几个职位"这一信息

use std::fmt::Display;

/// 职位处理上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingCtx {
    /// 搜索结果页码（从 0 开始）
    pub page_number: usize,

    /// 职位在当前页中的位置（从 0 开始）
    pub position: usize,
}

impl ListingCtx {
    pub fn new(page_number: usize, position: usize) -> Self {
        Self {
            page_number,
            position,
        }
    }
}

impl Display for ListingCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[第 {} 页 #{}]", self.page_number + 1, self.position + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_one_based() {
        assert_eq!(ListingCtx::new(0, 0).to_string(), "[第 1 页 #1]");
        assert_eq!(ListingCtx::new(2, 7).to_string(), "[第 3 页 #8]");
    }
}
