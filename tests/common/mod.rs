//! 测试用的模拟门户网站
//!
//! `FakePortal` 按脚本返回职位卡片和申请向导按钮，`pause` 不真正等待。

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use auto_apply::config::{Config, Selectors};
use auto_apply::error::{AutomationError, AutomationResult, NotifyError};
use auto_apply::infrastructure::PageSurface;
use auto_apply::services::Notifier;

pub const SUBMIT_LABEL: &str = "Submit application";
pub const CONTINUE_LABEL: &str = "Continue to next step";

/// 一个模拟职位
#[derive(Debug, Clone)]
pub struct FakeListing {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    /// 详情区域是否渲染
    pub detail_panel: bool,
    /// 申请按钮文字，`None` 表示没有申请按钮
    pub apply_label: Option<String>,
    pub file_input: bool,
    /// 提交前需要点击多少次"下一步"
    pub steps_before_submit: usize,
    /// 在第几步之后不再出现按钮
    pub stall_at: Option<usize>,
    /// 最后一步的按钮文字
    pub final_label: String,
    /// 打开职位时返回普通自动化错误
    pub fail_on_open: bool,
    /// 打开职位时浏览器会话丢失
    pub lose_session_on_open: bool,
    /// 上传简历时返回错误
    pub fail_upload: bool,
}

impl FakeListing {
    pub fn easy(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            company: Some("Acme".to_string()),
            location: Some("Remote".to_string()),
            detail_panel: true,
            apply_label: Some("Easy Apply".to_string()),
            file_input: true,
            steps_before_submit: 2,
            stall_at: None,
            final_label: SUBMIT_LABEL.to_string(),
            fail_on_open: false,
            lose_session_on_open: false,
            fail_upload: false,
        }
    }

    pub fn external(title: &str) -> Self {
        Self {
            apply_label: Some("Apply on company website".to_string()),
            ..Self::easy(title)
        }
    }

    pub fn without_apply_button(title: &str) -> Self {
        Self {
            apply_label: None,
            ..Self::easy(title)
        }
    }

    pub fn card_text(&self) -> String {
        [&self.title, &self.company, &self.location]
            .iter()
            .filter_map(|field| field.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// 模拟页面元素
#[derive(Debug, Clone, PartialEq)]
pub enum FakeElement {
    Card { page: usize, index: usize },
    Text(String),
    ApplyButton(String),
    ResumeInput,
    Action(String),
    Dismiss,
    DiscardConfirm,
    LoginField(&'static str),
    LoginSubmit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Location {
    Blank,
    Login,
    Results(usize),
}

#[derive(Debug, Default, Clone, Copy)]
struct WizardProgress {
    continues: usize,
    submitted: bool,
    discard_prompt: bool,
}

#[derive(Debug)]
struct PortalState {
    location: Location,
    opened: Option<(usize, usize)>,
    wizard: Option<WizardProgress>,
    logged_in: bool,
    navigations: Vec<String>,
    opened_count: usize,
    uploads: Vec<PathBuf>,
    submitted_titles: Vec<String>,
    dismissals: usize,
    discards: usize,
    typed: Vec<String>,
}

/// 模拟门户网站
pub struct FakePortal {
    pages: Vec<Vec<FakeListing>>,
    failing_pages: HashSet<usize>,
    lost_pages: HashSet<usize>,
    selectors: Selectors,
    login_url: String,
    page_size: usize,
    state: Mutex<PortalState>,
}

impl FakePortal {
    pub fn new(pages: Vec<Vec<FakeListing>>) -> Self {
        let config = Config::default();
        Self {
            pages,
            failing_pages: HashSet::new(),
            lost_pages: HashSet::new(),
            selectors: config.selectors,
            login_url: config.portal.login_url,
            page_size: config.portal.page_size,
            state: Mutex::new(PortalState {
                location: Location::Blank,
                opened: None,
                wizard: None,
                logged_in: false,
                navigations: Vec::new(),
                opened_count: 0,
                uploads: Vec::new(),
                submitted_titles: Vec::new(),
                dismissals: 0,
                discards: 0,
                typed: Vec::new(),
            }),
        }
    }

    /// 所有页面的职位都来自同一个模板
    pub fn uniform(pages: usize, per_page: usize, template: FakeListing) -> Self {
        let pages = (0..pages)
            .map(|p| {
                (0..per_page)
                    .map(|i| FakeListing {
                        title: Some(format!("Job {}-{}", p, i)),
                        ..template.clone()
                    })
                    .collect()
            })
            .collect();
        Self::new(pages)
    }

    /// 加载该页时返回普通导航错误
    pub fn with_failing_page(mut self, page: usize) -> Self {
        self.failing_pages.insert(page);
        self
    }

    /// 加载该页时浏览器会话丢失
    pub fn with_lost_session_at_page(mut self, page: usize) -> Self {
        self.lost_pages.insert(page);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PortalState> {
        self.state.lock().unwrap()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.lock().navigations.clone()
    }

    /// 已访问的搜索结果页码
    pub fn visited_pages(&self) -> Vec<usize> {
        self.lock()
            .navigations
            .iter()
            .filter_map(|url| page_of(url, self.page_size))
            .collect()
    }

    pub fn opened_count(&self) -> usize {
        self.lock().opened_count
    }

    pub fn uploads(&self) -> Vec<PathBuf> {
        self.lock().uploads.clone()
    }

    pub fn submitted_titles(&self) -> Vec<String> {
        self.lock().submitted_titles.clone()
    }

    pub fn dismissals(&self) -> usize {
        self.lock().dismissals
    }

    pub fn discards(&self) -> usize {
        self.lock().discards
    }

    pub fn typed(&self) -> Vec<String> {
        self.lock().typed.clone()
    }

    pub fn logged_in(&self) -> bool {
        self.lock().logged_in
    }

    pub fn wizard_open(&self) -> bool {
        self.lock().wizard.is_some()
    }

    fn opened_listing(&self, state: &PortalState) -> Option<&FakeListing> {
        let (page, index) = state.opened?;
        self.pages.get(page)?.get(index)
    }

    fn current_action(&self, state: &PortalState) -> Option<String> {
        let listing = self.opened_listing(state)?;
        let wizard = state.wizard?;
        if wizard.submitted || wizard.discard_prompt {
            return None;
        }
        if listing.stall_at == Some(wizard.continues) {
            return None;
        }
        if wizard.continues < listing.steps_before_submit {
            Some(CONTINUE_LABEL.to_string())
        } else {
            Some(listing.final_label.clone())
        }
    }
}

fn page_of(url: &str, page_size: usize) -> Option<usize> {
    let start = url
        .split(['?', '&'])
        .find_map(|pair| pair.strip_prefix("start="))?;
    start.parse::<usize>().ok().map(|start| start / page_size)
}

fn text(field: &Option<String>) -> Vec<FakeElement> {
    field
        .as_ref()
        .map(|value| vec![FakeElement::Text(value.clone())])
        .unwrap_or_default()
}

#[async_trait]
impl PageSurface for FakePortal {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> AutomationResult<()> {
        let mut state = self.lock();
        state.navigations.push(url.to_string());
        state.opened = None;
        state.wizard = None;

        if url.starts_with(&self.login_url) {
            state.location = Location::Login;
            return Ok(());
        }

        let page = page_of(url, self.page_size).unwrap_or(0);
        if self.lost_pages.contains(&page) {
            return Err(AutomationError::SessionLost("websocket closed".to_string()));
        }
        if self.failing_pages.contains(&page) {
            state.location = Location::Blank;
            return Err(AutomationError::command("net::ERR_CONNECTION_RESET"));
        }
        state.location = Location::Results(page);
        Ok(())
    }

    async fn find_all(&self, selector: &str) -> AutomationResult<Vec<Self::Element>> {
        let state = self.lock();
        let s = &self.selectors;

        let found = if selector == s.listing_card {
            match state.location {
                Location::Results(page) => (0..self.pages.get(page).map_or(0, Vec::len))
                    .map(|index| FakeElement::Card { page, index })
                    .collect(),
                _ => Vec::new(),
            }
        } else if selector == s.login_username && state.location == Location::Login {
            vec![FakeElement::LoginField("username")]
        } else if selector == s.login_password && state.location == Location::Login {
            vec![FakeElement::LoginField("password")]
        } else if selector == s.login_submit && state.location == Location::Login {
            vec![FakeElement::LoginSubmit]
        } else if let Some(listing) = self.opened_listing(&state) {
            let panel = listing.detail_panel;
            if selector == s.detail_title && panel {
                text(&listing.title)
            } else if selector == s.detail_company && panel {
                text(&listing.company)
            } else if selector == s.detail_location && panel {
                text(&listing.location)
            } else if selector == s.apply_button && state.wizard.is_none() {
                listing
                    .apply_label
                    .iter()
                    .map(|label| FakeElement::ApplyButton(label.clone()))
                    .collect()
            } else if selector == s.resume_input && state.wizard.is_some() && listing.file_input {
                vec![FakeElement::ResumeInput]
            } else if selector == s.wizard_action {
                self.current_action(&state)
                    .map(|label| vec![FakeElement::Action(label)])
                    .unwrap_or_default()
            } else if selector == s.dialog_dismiss && state.wizard.is_some() {
                vec![FakeElement::Dismiss]
            } else if selector == s.discard_confirm
                && state.wizard.map_or(false, |w| w.discard_prompt)
            {
                vec![FakeElement::DiscardConfirm]
            } else {
                Vec::new()
            }
        } else {
            Vec::new()
        };

        Ok(found)
    }

    async fn click(&self, element: &Self::Element) -> AutomationResult<()> {
        let mut state = self.lock();

        match element {
            FakeElement::Card { page, index } => {
                let listing = &self.pages[*page][*index];
                if listing.lose_session_on_open {
                    return Err(AutomationError::SessionLost("target crashed".to_string()));
                }
                if listing.fail_on_open {
                    return Err(AutomationError::command("node is detached from document"));
                }
                state.opened = Some((*page, *index));
                state.wizard = None;
                state.opened_count += 1;
            }
            FakeElement::ApplyButton(_) => {
                state.wizard = Some(WizardProgress::default());
            }
            FakeElement::Action(label) => {
                let title = self
                    .opened_listing(&state)
                    .and_then(|listing| listing.title.clone())
                    .unwrap_or_default();
                if let Some(wizard) = state.wizard.as_mut() {
                    if label == SUBMIT_LABEL {
                        wizard.submitted = true;
                    } else {
                        wizard.continues += 1;
                    }
                }
                if label == SUBMIT_LABEL {
                    state.submitted_titles.push(title);
                }
            }
            FakeElement::Dismiss => {
                let submitted = state.wizard.map_or(false, |w| w.submitted);
                if submitted {
                    state.wizard = None;
                    state.dismissals += 1;
                } else if let Some(wizard) = state.wizard.as_mut() {
                    wizard.discard_prompt = true;
                }
            }
            FakeElement::DiscardConfirm => {
                state.wizard = None;
                state.discards += 1;
            }
            FakeElement::LoginSubmit => state.logged_in = true,
            FakeElement::Text(_) | FakeElement::ResumeInput | FakeElement::LoginField(_) => {}
        }
        Ok(())
    }

    async fn type_text(&self, element: &Self::Element, text: &str) -> AutomationResult<()> {
        if let FakeElement::LoginField(field) = element {
            self.lock().typed.push(format!("{}={}", field, text));
        }
        Ok(())
    }

    async fn upload_file(&self, _element: &Self::Element, path: &Path) -> AutomationResult<()> {
        let mut state = self.lock();
        if self.opened_listing(&state).map_or(false, |l| l.fail_upload) {
            return Err(AutomationError::command("file chooser rejected"));
        }
        state.uploads.push(path.to_path_buf());
        Ok(())
    }

    async fn text_of(&self, element: &Self::Element) -> AutomationResult<String> {
        let text = match element {
            FakeElement::Card { page, index } => self.pages[*page][*index].card_text(),
            FakeElement::Text(text)
            | FakeElement::ApplyButton(text)
            | FakeElement::Action(text) => text.clone(),
            FakeElement::Dismiss => "Dismiss".to_string(),
            FakeElement::DiscardConfirm => "Discard".to_string(),
            FakeElement::LoginSubmit => "Sign in".to_string(),
            FakeElement::ResumeInput | FakeElement::LoginField(_) => String::new(),
        };
        Ok(text)
    }

    async fn pause(&self, _duration: Duration) {}
}

/// 记录所有通知的 Notifier，可设置为总是失败
#[derive(Default)]
pub struct RecordingNotifier {
    fail: bool,
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(message.to_string());
        if self.fail {
            Err(NotifyError::BadStatus(503))
        } else {
            Ok(())
        }
    }

    fn kind(&self) -> &'static str {
        "recording"
    }
}

/// 测试用配置：默认值，简历路径由调用方决定
pub fn test_config() -> Config {
    Config::default()
}

pub fn resume_path() -> PathBuf {
    PathBuf::from("resume.pdf")
}
