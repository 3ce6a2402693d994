//! Navigation state machine over storefront views and configuration steps.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// Steps inside the configuration view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigStep {
    /// Upload a document.
    Upload,
    /// Preview and confirm the page count.
    Preview,
    /// Choose options and see pricing.
    Options,
}

impl ConfigStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigStep::Upload => "upload",
            ConfigStep::Preview => "preview",
            ConfigStep::Options => "options",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ConfigStep::Upload => "Subir archivo",
            ConfigStep::Preview => "Vista previa",
            ConfigStep::Options => "Opciones",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            ConfigStep::Upload => 1,
            ConfigStep::Preview => 2,
            ConfigStep::Options => 3,
        }
    }

    const ALL: [ConfigStep; 3] = [ConfigStep::Upload, ConfigStep::Preview, ConfigStep::Options];
}

/// Top-level storefront views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    Home,
    Category,
    Product,
    Config,
    Checkout,
    Confirmation,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::Category => "category",
            View::Product => "product",
            View::Config => "config",
            View::Checkout => "checkout",
            View::Confirmation => "confirmation",
        }
    }
}

/// View/step finite-state machine.
///
/// Forward motion to a configuration step is only enabled once every
/// earlier step has been visited in the current configuration session.
/// The confirmation view is terminal and reachable only by reporting a
/// successful order submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Navigator {
    view: View,
    step: ConfigStep,
    visited: Vec<ConfigStep>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            view: View::Home,
            step: ConfigStep::Upload,
            visited: vec![ConfigStep::Upload],
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn step(&self) -> ConfigStep {
        self.step
    }

    fn invalid(&self, to: &str) -> CommerceError {
        CommerceError::InvalidTransition {
            from: self.view.as_str().to_string(),
            to: to.to_string(),
        }
    }

    /// Navigate between the browsing views (home, category, product).
    ///
    /// These are freely reachable except from the terminal confirmation
    /// view, which only allows starting a new session.
    pub fn browse(&mut self, view: View) -> Result<(), CommerceError> {
        if self.view == View::Confirmation {
            return Err(self.invalid(view.as_str()));
        }
        match view {
            View::Home | View::Category | View::Product => {
                self.view = view;
                Ok(())
            }
            _ => Err(self.invalid(view.as_str())),
        }
    }

    /// Enter the configuration view at the upload step with a fresh
    /// step history.
    pub fn begin_configuration(&mut self) -> Result<(), CommerceError> {
        if self.view == View::Confirmation {
            return Err(self.invalid(View::Config.as_str()));
        }
        self.view = View::Config;
        self.step = ConfigStep::Upload;
        self.visited = vec![ConfigStep::Upload];
        Ok(())
    }

    /// Enter the configuration view seeded at the options step, as when
    /// editing an existing cart item. Upload and preview are bypassed.
    pub fn begin_edit(&mut self) -> Result<(), CommerceError> {
        if self.view == View::Confirmation {
            return Err(self.invalid(View::Config.as_str()));
        }
        self.view = View::Config;
        self.step = ConfigStep::Options;
        self.visited = ConfigStep::ALL.to_vec();
        Ok(())
    }

    /// Whether a step is reachable: every earlier step must have been
    /// visited this configuration session.
    pub fn can_enter_step(&self, step: ConfigStep) -> bool {
        ConfigStep::ALL
            .iter()
            .filter(|s| s.number() < step.number())
            .all(|s| self.visited.contains(s))
    }

    /// Move to a configuration step, recording the visit.
    pub fn go_to_step(&mut self, step: ConfigStep) -> Result<(), CommerceError> {
        if self.view != View::Config {
            return Err(self.invalid(step.as_str()));
        }
        if !self.can_enter_step(step) {
            return Err(self.invalid(step.as_str()));
        }
        if !self.visited.contains(&step) {
            self.visited.push(step);
        }
        self.step = step;
        Ok(())
    }

    /// Enter the checkout view. The caller re-renders from the cart; an
    /// empty cart has nothing to check out.
    pub fn enter_checkout(&mut self, cart_is_empty: bool) -> Result<(), CommerceError> {
        if self.view == View::Confirmation || cart_is_empty {
            return Err(self.invalid(View::Checkout.as_str()));
        }
        self.view = View::Checkout;
        Ok(())
    }

    /// Report a successful order submission. Only valid from checkout.
    pub fn order_confirmed(&mut self) -> Result<(), CommerceError> {
        if self.view != View::Checkout {
            return Err(self.invalid(View::Confirmation.as_str()));
        }
        self.view = View::Confirmation;
        Ok(())
    }

    /// Leave the terminal confirmation view and start over.
    pub fn start_new_session(&mut self) -> Result<(), CommerceError> {
        if self.view != View::Confirmation {
            return Err(self.invalid(View::Home.as_str()));
        }
        *self = Self::new();
        Ok(())
    }
}
