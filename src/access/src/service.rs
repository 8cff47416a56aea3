//! Access control service
//!
//! Request-gating entry point for the web, deposit and datastream layers.
//! Fetches the ancestor chain from the configured provider and hands it to
//! the [`AccessDecisionEngine`].

use crate::ancestry::AncestryProvider;
use crate::catalog::Permission;
use crate::config::AccessConfig;
use crate::engine::{AccessDecision, AccessDecisionEngine, AccessRestrictions, EngineMetrics, MetricsCollector};
use crate::error::{AccessError, Result};
use crate::global::GlobalPermissionEvaluator;
use crate::types::{ContentId, PrincipalSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Access control entry point
pub struct AccessControlService {
    engine: AccessDecisionEngine,

    provider: Arc<dyn AncestryProvider>,

    metrics: Option<Arc<MetricsCollector>>,
}

impl AccessControlService {
    /// Create a service over `provider`
    pub fn new(engine: AccessDecisionEngine, provider: Arc<dyn AncestryProvider>) -> Self {
        info!(
            "AccessControlService initialized with {} global principals",
            engine.global().global_principals().len()
        );
        Self {
            engine,
            provider,
            metrics: None,
        }
    }

    /// Build a service from loaded configuration
    pub fn from_config(config: &AccessConfig, provider: Arc<dyn AncestryProvider>) -> Self {
        let global = GlobalPermissionEvaluator::from_config(&config.global);
        Self::new(AccessDecisionEngine::new(global), provider)
    }

    /// Enable metrics collection
    pub fn with_metrics(mut self) -> Self {
        self.metrics = Some(Arc::new(MetricsCollector::new()));
        self
    }

    /// The decision engine used for every check
    pub fn engine(&self) -> &AccessDecisionEngine {
        &self.engine
    }

    /// Current metrics snapshot, if collection is enabled
    pub async fn metrics(&self) -> Option<EngineMetrics> {
        match &self.metrics {
            Some(metrics) => Some(metrics.snapshot().await),
            None => None,
        }
    }

    /// Whether `principals` hold `permission` on `target`
    ///
    /// Fails closed: an unresolvable ancestry is reported as a denial.
    pub async fn has_access(
        &self,
        target: &ContentId,
        principals: &PrincipalSet,
        permission: Permission,
        is_embargoed: bool,
    ) -> bool {
        self.has_access_with_restrictions(
            target,
            principals,
            permission,
            AccessRestrictions::embargoed(is_embargoed),
        )
        .await
    }

    /// [`Self::has_access`] with the full set of restrictions
    pub async fn has_access_with_restrictions(
        &self,
        target: &ContentId,
        principals: &PrincipalSet,
        permission: Permission,
        restrictions: AccessRestrictions,
    ) -> bool {
        match self.decide_with_restrictions(target, principals, permission, restrictions).await {
            Ok(decision) => decision.granted,
            Err(e) => {
                warn!("Denying {} on {}: {}", permission, target, e);
                false
            }
        }
    }

    /// Require `permission` on `target`
    ///
    /// Returns [`AccessError::AccessDenied`] carrying `message` on refusal and
    /// [`AccessError::AncestryUnavailable`] when no safe verdict exists.
    pub async fn assert_has_access(
        &self,
        message: &str,
        target: &ContentId,
        principals: &PrincipalSet,
        permission: Permission,
        is_embargoed: bool,
    ) -> Result<()> {
        self.assert_has_access_with_restrictions(
            message,
            target,
            principals,
            permission,
            AccessRestrictions::embargoed(is_embargoed),
        )
        .await
    }

    /// [`Self::assert_has_access`] with the full set of restrictions
    pub async fn assert_has_access_with_restrictions(
        &self,
        message: &str,
        target: &ContentId,
        principals: &PrincipalSet,
        permission: Permission,
        restrictions: AccessRestrictions,
    ) -> Result<()> {
        let decision = self
            .decide_with_restrictions(target, principals, permission, restrictions)
            .await?;

        if decision.granted {
            Ok(())
        } else {
            Err(AccessError::AccessDenied {
                message: message.to_string(),
                target: decision.target,
                permission,
                reason: decision.reason.to_string(),
            })
        }
    }

    /// Full decision record, surfacing provider failures
    pub async fn decide(
        &self,
        target: &ContentId,
        principals: &PrincipalSet,
        permission: Permission,
        is_embargoed: bool,
    ) -> Result<AccessDecision> {
        self.decide_with_restrictions(
            target,
            principals,
            permission,
            AccessRestrictions::embargoed(is_embargoed),
        )
        .await
    }

    /// [`Self::decide`] with the full set of restrictions
    pub async fn decide_with_restrictions(
        &self,
        target: &ContentId,
        principals: &PrincipalSet,
        permission: Permission,
        restrictions: AccessRestrictions,
    ) -> Result<AccessDecision> {
        let start = Instant::now();

        debug!(
            "Access check: target={}, principals={}, permission={}",
            target, principals, permission
        );

        if let Some(decision) = self.engine.check_global(target, principals, permission) {
            self.record(&decision, start).await;
            return Ok(decision);
        }

        let chain = match self.resolve_chain(target).await {
            Ok(chain) => chain,
            Err(e) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_ancestry_failure().await;
                }
                return Err(e);
            }
        };

        let decision = self.engine.evaluate(&chain, principals, permission, restrictions);
        self.record(&decision, start).await;
        Ok(decision)
    }

    async fn resolve_chain(&self, target: &ContentId) -> Result<crate::ancestry::AncestorChain> {
        let chain = self.provider.ancestor_chain(target).await?;
        chain.ensure_target(target)?;
        Ok(chain)
    }

    async fn record(&self, decision: &AccessDecision, start: Instant) {
        if let Some(metrics) = &self.metrics {
            metrics.record_decision(decision, start.elapsed()).await;
        }
    }
}
