// Settings service - Session user and notification preferences
use crate::application::settings_store::SettingsStore;
use crate::domain::error::DomainError;
use crate::domain::settings::{NotificationPreferences, SettingsDocument, UserProfile};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
    // Serializes read-modify-write cycles against the store
    write_lock: Arc<Mutex<()>>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn document(&self) -> Result<SettingsDocument, DomainError> {
        match self.store.load().await? {
            Some(document) => document.check_version(),
            None => Ok(SettingsDocument::default()),
        }
    }

    async fn modify<F>(&self, change: F) -> Result<SettingsDocument, DomainError>
    where
        F: FnOnce(&mut SettingsDocument),
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.document().await?;
        change(&mut document);
        self.store.save(&document).await?;
        Ok(document)
    }

    pub async fn notifications(&self) -> Result<NotificationPreferences, DomainError> {
        Ok(self.document().await?.notifications)
    }

    pub async fn update_notifications(
        &self,
        preferences: NotificationPreferences,
    ) -> Result<NotificationPreferences, DomainError> {
        let document = self
            .modify(|doc| doc.notifications = preferences)
            .await?;
        tracing::info!(?preferences, "notification preferences updated");
        Ok(document.notifications)
    }

    pub async fn current_user(&self) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.document().await?.user)
    }

    pub async fn sign_in(&self, user: UserProfile) -> Result<UserProfile, DomainError> {
        tracing::info!(user_id = %user.id, role = %user.role, "session started");
        self.modify(|doc| doc.user = Some(user.clone())).await?;
        Ok(user)
    }

    pub async fn sign_out(&self) -> Result<(), DomainError> {
        let document = self.modify(|doc| doc.user = None).await?;
        tracing::info!(notifications = ?document.notifications, "session cleared");
        Ok(())
    }
}
