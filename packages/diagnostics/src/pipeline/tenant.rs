//! Tenant resolution - an ordered chain of sources, first hit wins.
//!
//! 1. tenant id supplied by the caller
//! 2. tenant named by the caller's session
//! 3. owner of the order, looked up in the `OrderDirectory`
//!
//! If every source comes up empty the request fails. There is no default
//! tenant.

use tracing::debug;
use uuid::Uuid;

use crate::error::{DiagnosticsError, Result};
use crate::traits::store::OrderDirectory;
use crate::types::outcome::RequestContext;

/// Where a tenant id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantSource {
    Explicit,
    Session,
    OrderOwner,
}

/// Resolution order.
pub const CHAIN: [TenantSource; 3] = [
    TenantSource::Explicit,
    TenantSource::Session,
    TenantSource::OrderOwner,
];

/// Inputs available to the resolver.
#[derive(Debug, Clone, Copy)]
pub struct TenantQuery<'a> {
    pub order_id: Uuid,
    pub explicit: Option<Uuid>,
    pub context: &'a RequestContext,
}

/// A resolved tenant and the source that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTenant {
    pub tenant_id: Uuid,
    pub source: TenantSource,
}

impl TenantSource {
    async fn lookup<D>(self, query: &TenantQuery<'_>, directory: &D) -> Result<Option<Uuid>>
    where
        D: OrderDirectory + ?Sized,
    {
        match self {
            Self::Explicit => Ok(query.explicit),
            Self::Session => Ok(query.context.session_tenant_id),
            Self::OrderOwner => directory.order_owner(query.order_id).await,
        }
    }
}

/// Walk the chain and return the first tenant found.
pub async fn resolve_tenant<D>(query: &TenantQuery<'_>, directory: &D) -> Result<ResolvedTenant>
where
    D: OrderDirectory + ?Sized,
{
    for source in CHAIN {
        if let Some(tenant_id) = source.lookup(query, directory).await? {
            debug!(order_id = %query.order_id, tenant_id = %tenant_id, source = ?source, "Tenant resolved");
            return Ok(ResolvedTenant { tenant_id, source });
        }
    }

    Err(DiagnosticsError::TenantUnresolved {
        order_id: query.order_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;

    #[tokio::test]
    async fn test_explicit_wins_without_lookup() {
        let store = MemoryStore::new();
        let order_id = Uuid::new_v4();
        let explicit = Uuid::new_v4();
        store.register_order_owner(order_id, Uuid::new_v4());

        let context = RequestContext::new().with_session_tenant(Uuid::new_v4());
        let query = TenantQuery {
            order_id,
            explicit: Some(explicit),
            context: &context,
        };

        let resolved = resolve_tenant(&query, &store).await.unwrap();
        assert_eq!(resolved.tenant_id, explicit);
        assert_eq!(resolved.source, TenantSource::Explicit);
        assert_eq!(store.owner_lookups(), 0);
    }

    #[tokio::test]
    async fn test_session_before_order_owner() {
        let store = MemoryStore::new();
        let order_id = Uuid::new_v4();
        let session = Uuid::new_v4();
        store.register_order_owner(order_id, Uuid::new_v4());

        let context = RequestContext::new().with_session_tenant(session);
        let query = TenantQuery {
            order_id,
            explicit: None,
            context: &context,
        };

        let resolved = resolve_tenant(&query, &store).await.unwrap();
        assert_eq!(resolved.tenant_id, session);
        assert_eq!(resolved.source, TenantSource::Session);
        assert_eq!(store.owner_lookups(), 0);
    }

    #[tokio::test]
    async fn test_order_owner_is_last_resort() {
        let store = MemoryStore::new();
        let order_id = Uuid::new_v4();
        let owner = Uuid::new_v4();
        store.register_order_owner(order_id, owner);

        let context = RequestContext::new();
        let query = TenantQuery {
            order_id,
            explicit: None,
            context: &context,
        };

        let resolved = resolve_tenant(&query, &store).await.unwrap();
        assert_eq!(resolved.tenant_id, owner);
        assert_eq!(resolved.source, TenantSource::OrderOwner);
        assert_eq!(store.owner_lookups(), 1);
    }

    #[tokio::test]
    async fn test_unresolved_is_an_error() {
        let store = MemoryStore::new();
        let context = RequestContext::new();
        let order_id = Uuid::new_v4();
        let query = TenantQuery {
            order_id,
            explicit: None,
            context: &context,
        };

        let err = resolve_tenant(&query, &store).await.unwrap_err();
        assert!(matches!(err, DiagnosticsError::TenantUnresolved { order_id: id } if id == order_id));
        assert!(err.is_fatal());
    }
}
