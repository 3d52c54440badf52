use crate::{
    config::{
        ConfigError, PUBLIC_API_KEY_VAR, PUBLIC_APP_ID_VAR, PUBLIC_PROJECT_ID_VAR, PublicConfig,
    },
    error::{Error, StoreErrorKind},
    obs::{MetricsSink, StoreOp},
    store::{Collection, EntryStore, adapter::StoreCore},
    types::{Entry, EntryId, OwnerId, PlayerName, Sample},
};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

///
/// AccessRules
/// What an audience-scoped client may do. The default allows reading and
/// creating entries but not changing existing ones.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct AccessRules {
    pub read: bool,
    pub create: bool,
    pub modify: bool,
}

impl AccessRules {
    pub const OPEN: Self = Self {
        read: true,
        create: true,
        modify: true,
    };

    #[must_use]
    pub const fn allows(&self, op: StoreOp) -> bool {
        match op {
            StoreOp::List => self.read,
            StoreOp::Create => self.create,
            StoreOp::Update | StoreOp::Delete => self.modify,
        }
    }
}

impl Default for AccessRules {
    fn default() -> Self {
        Self {
            read: true,
            create: true,
            modify: false,
        }
    }
}

///
/// ClientStore
///
/// Restricted adapter: identified by public config and gated by
/// [`AccessRules`]. Denied operations fail with `PermissionDenied` and never
/// reach the collection.
///

pub struct ClientStore {
    core: StoreCore,
    rules: AccessRules,
}

impl ClientStore {
    pub fn connect(
        config: &PublicConfig,
        rules: AccessRules,
        collection: Arc<dyn Collection>,
    ) -> Result<Self, Error> {
        let vars: Vec<String> = [
            (PUBLIC_API_KEY_VAR, &config.api_key),
            (PUBLIC_PROJECT_ID_VAR, &config.project_id),
            (PUBLIC_APP_ID_VAR, &config.app_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(var, _)| var.to_string())
        .collect();
        if !vars.is_empty() {
            return Err(ConfigError::MissingPublic { vars }.into());
        }

        info!(project = %config.project_id, app = %config.app_id, ?rules, "client store connected");

        Ok(Self {
            core: StoreCore::new(collection, config.project_id.clone()),
            rules,
        })
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.core.set_sink(sink);
        self
    }

    #[must_use]
    pub const fn rules(&self) -> AccessRules {
        self.rules
    }

    fn check(&self, op: StoreOp) -> Result<(), Error> {
        if self.rules.allows(op) {
            return Ok(());
        }

        warn!(project = %self.core.project_id(), ?op, "client store op denied by access rules");
        self.core.denied(op);

        Err(Error::store(
            StoreErrorKind::PermissionDenied,
            format!("missing or insufficient permissions for {op:?}"),
        ))
    }
}

#[async_trait]
impl EntryStore for ClientStore {
    async fn create(
        &self,
        owner_id: OwnerId,
        owner_name: PlayerName,
        sample: Sample,
    ) -> Result<EntryId, Error> {
        self.check(StoreOp::Create)?;
        self.core.create(owner_id, owner_name, sample).await
    }

    async fn list_all(&self) -> Result<Vec<Entry>, Error> {
        self.check(StoreOp::List)?;
        self.core.list_all().await
    }

    async fn list_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Entry>, Error> {
        self.check(StoreOp::List)?;
        self.core.list_by_owner(owner_id).await
    }

    async fn update(&self, id: EntryId, sample: Sample) -> Result<(), Error> {
        self.check(StoreOp::Update)?;
        self.core.update(id, sample).await
    }

    async fn delete(&self, id: EntryId) -> Result<(), Error> {
        self.check(StoreOp::Delete)?;
        self.core.delete(id).await
    }
}
