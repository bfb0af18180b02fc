//! Server-side HTML for the console layout and pages.
//!
//! Every page body and the surrounding layout are Handlebars templates compiled
//! into the binary; interpolated values are HTML-escaped by the registry.

use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;

use super::Page;
use crate::error::ConsoleError;
use crate::types::Principal;

pub const NAVIGATION: &[(&str, &str, &str)] = &[
    ("Dashboard", "/dashboard", "📊"),
    ("Integrations", "/integrations", "🔗"),
    ("Connect Salesforce", "/connect-salesforce", "➕"),
    ("Advisors", "/advisors", "👥"),
    ("Clients", "/clients", "👤"),
    ("Activity", "/activity", "📋"),
    ("Workflows", "/workflows", "⚡"),
    ("Settings", "/settings", "⚙️"),
];

const PARTIALS: &[(&str, &str)] = &[
    ("badge", include_str!("../../templates/partials/badge.hbs")),
    ("empty_state", include_str!("../../templates/partials/empty_state.hbs")),
];

const TEMPLATES: &[(&str, &str)] = &[
    ("layout", include_str!("../../templates/layout.hbs")),
    ("error", include_str!("../../templates/error.hbs")),
    ("clients", include_str!("../../templates/clients.hbs")),
    ("client_detail", include_str!("../../templates/client_detail.hbs")),
    ("advisors", include_str!("../../templates/advisors.hbs")),
    ("activity", include_str!("../../templates/activity.hbs")),
    ("integrations", include_str!("../../templates/integrations.hbs")),
    ("dashboard", include_str!("../../templates/dashboard.hbs")),
    ("connect", include_str!("../../templates/connect.hbs")),
    ("settings", include_str!("../../templates/settings.hbs")),
    ("workflows", include_str!("../../templates/workflows.hbs")),
];

#[derive(Serialize)]
struct NavItem {
    name: &'static str,
    href: &'static str,
    icon: &'static str,
    active: bool,
}

#[derive(Serialize)]
struct LayoutContext<'a> {
    title: &'a str,
    nav: Vec<NavItem>,
    principal: Option<&'a str>,
    body: &'a str,
}

#[derive(Serialize)]
struct PageContext<'a, P> {
    title: &'a str,
    page: &'a P,
}

#[derive(Serialize)]
struct ErrorContext<'a> {
    unauthenticated: bool,
    login_url: &'a str,
    context: &'a str,
    message: String,
}

/// Compiled template registry, built once at startup
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        for (name, source) in PARTIALS {
            registry.register_partial(name, *source)?;
        }
        for (name, source) in TEMPLATES {
            registry.register_template_string(name, *source)?;
        }
        Ok(Self { registry })
    }

    /// Whole document for a page: its template wrapped in the layout
    pub fn page<P: Page>(&self, page: &P, principal: Option<&Principal>) -> Result<String, RenderError> {
        let title = page.title();
        let body = self.registry.render(
            page.template(),
            &PageContext {
                title: &title,
                page,
            },
        )?;
        self.layout(&title, page.nav(), principal, &body)
    }

    /// Inline failure panel in place of the page body. Never contains a table.
    pub fn error(
        &self,
        nav: &str,
        context: &str,
        error: &ConsoleError,
        login_url: &str,
        principal: Option<&Principal>,
    ) -> Result<String, RenderError> {
        let body = self.registry.render(
            "error",
            &ErrorContext {
                unauthenticated: matches!(error, ConsoleError::AuthenticationAbsent),
                login_url,
                context,
                message: error.to_string(),
            },
        )?;
        self.layout("Error", nav, principal, &body)
    }

    fn layout(&self, title: &str, active: &str, principal: Option<&Principal>, body: &str) -> Result<String, RenderError> {
        let nav = NAVIGATION
            .iter()
            .map(|&(name, href, icon)| NavItem {
                name,
                href,
                icon,
                active: href == active,
            })
            .collect();

        self.registry.render(
            "layout",
            &LayoutContext {
                title,
                nav,
                principal: principal.and_then(|p| p.email.as_deref()),
                body,
            },
        )
    }
}
