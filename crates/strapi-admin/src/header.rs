//! Users list header props builder.
//!
//! Builds the declarative props record for the header component: two fixed
//! actions, a pluralized description and a title. All strings go through
//! the caller's [`MessageFormatter`]; nothing else happens here.

use std::fmt;
use std::sync::Arc;

const TRAD_BASE_ID: &str = "Settings.permissions.users.listview.";

/// Message-formatting collaborator.
///
/// `values` carries interpolation pairs, e.g. `("number", "4")`.
pub trait MessageFormatter {
    fn format_message(&self, id: &str, values: &[(&str, &str)]) -> String;
}

/// Zero-argument click handler bound to an action
pub type ClickHandler = Arc<dyn Fn() + Send + Sync>;

/// Visual style of a header action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionColor {
    Delete,
    Primary,
}

/// Rendered element kind of a header action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Button,
}

/// One action rendered in the header
#[derive(Clone)]
pub struct HeaderAction {
    pub color: ActionColor,
    pub disabled: bool,
    pub icon: bool,
    pub label: String,
    pub kind: ActionKind,
    pub on_click: Option<ClickHandler>,
}

impl HeaderAction {
    /// Invoke the action's click handler, if any
    pub fn click(&self) {
        if let Some(handler) = &self.on_click {
            handler();
        }
    }
}

impl fmt::Debug for HeaderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderAction")
            .field("color", &self.color)
            .field("disabled", &self.disabled)
            .field("icon", &self.icon)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("on_click", &self.on_click.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

/// Header title record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTitle {
    pub label: String,
}

/// Declarative props for the header component
#[derive(Debug, Clone)]
pub struct HeaderProps {
    pub actions: Vec<HeaderAction>,
    pub content: String,
    pub title: HeaderTitle,
}

/// Builder for the users list header props.
///
/// Defaults: `count = 0`, no-op add-user callback.
#[derive(Clone)]
pub struct ListHeaderBuilder {
    count: u64,
    on_click_add_user: ClickHandler,
}

impl ListHeaderBuilder {
    pub fn new() -> Self {
        Self {
            count: 0,
            on_click_add_user: Arc::new(|| {}),
        }
    }

    /// Number of users shown in the list
    pub fn count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    /// Callback invoked by the create action
    pub fn on_add_user(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_click_add_user = Arc::new(handler);
        self
    }

    /// Build the props record.
    ///
    /// Content uses the plural message key when `count > 1`, singular
    /// otherwise, with the count interpolated either way.
    pub fn build(&self, formatter: &dyn MessageFormatter) -> HeaderProps {
        let description_suffix = if self.count > 1 {
            "header.description.plural"
        } else {
            "header.description.singular"
        };
        let count = self.count.to_string();

        HeaderProps {
            actions: vec![
                HeaderAction {
                    color: ActionColor::Delete,
                    disabled: true,
                    icon: false,
                    label: formatter.format_message("app.utils.delete", &[]),
                    kind: ActionKind::Button,
                    on_click: None,
                },
                HeaderAction {
                    color: ActionColor::Primary,
                    disabled: false,
                    icon: true,
                    label: formatter.format_message("Settings.permissions.users.create", &[]),
                    kind: ActionKind::Button,
                    on_click: Some(Arc::clone(&self.on_click_add_user)),
                },
            ],
            content: formatter.format_message(
                &format!("{TRAD_BASE_ID}{description_suffix}"),
                &[("number", &count)],
            ),
            title: HeaderTitle {
                label: formatter.format_message(&format!("{TRAD_BASE_ID}header.title"), &[]),
            },
        }
    }
}

impl Default for ListHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
