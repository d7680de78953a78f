//! Root application state threaded through the presentation layer.
//!
//! Theme, session and the notice board live here instead of in globals, and
//! every change arrives as an [`AppEvent`] through [`AppContext::dispatch`].

use crate::controller::TaskListController;
use crate::notice::{Notice, NoticeBoard, Notifier};
use crate::repository::TaskRepository;
use crate::session::{AuthProvider, AuthResult, Session};
use crate::theme::{PreferenceStore, Theme};
use tracing::{error, info, warn};

pub const SIGN_OUT_FAILED: &str = "Failed to sign out. Please try again.";

/// State changes the application reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Auth(AuthResult),
    SignedOut,
    ToggleTheme,
    SetTheme(Theme),
}

pub struct AppContext<P: PreferenceStore> {
    preferences: P,
    theme: Theme,
    session: Session,
    notices: NoticeBoard,
}

impl<P: PreferenceStore> AppContext<P> {
    /// Restores the saved theme, falling back to `system_prefers_dark`.
    pub fn new(preferences: P, system_prefers_dark: bool) -> Self {
        let theme = Theme::load(&preferences, system_prefers_dark);
        Self {
            preferences,
            theme,
            session: Session::default(),
            notices: NoticeBoard::new(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn dispatch(&mut self, event: AppEvent) {
        match event {
            AppEvent::Auth(result) => {
                if let AuthResult::Failed(reason) = &result {
                    warn!("Authentication failed: {}", reason);
                    self.notices
                        .notify(Notice::error(format!("Authentication failed: {}", reason)));
                }
                self.session.apply(result);
            }
            AppEvent::SignedOut => self.session.sign_out(),
            AppEvent::ToggleTheme => self.set_theme(self.theme.toggled()),
            AppEvent::SetTheme(theme) => self.set_theme(theme),
        }
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(err) = theme.save(&self.preferences) {
            warn!("Could not persist theme: {}", err);
        }
    }

    /// Asks the auth widget to sign out; the session is only cleared once it
    /// confirms.
    pub async fn logout<A: AuthProvider>(&mut self, provider: &A) {
        match provider.logout().await {
            Ok(()) => {
                info!("Signed out");
                self.dispatch(AppEvent::SignedOut);
            }
            Err(err) => {
                error!("Error signing out: {}", err);
                self.notices.notify(Notice::error(SIGN_OUT_FAILED));
            }
        }
    }

    /// A task list controller reporting through this context's notice board.
    pub fn task_list<R: TaskRepository>(&self, repository: R) -> TaskListController<R, NoticeBoard> {
        TaskListController::new(repository, self.notices.clone())
    }
}
