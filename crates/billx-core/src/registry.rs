use std::collections::HashMap;
use std::sync::Arc;

use crate::adapters::{Bit2BillAdapter, LivingRoomAdapter, PaidByCoinsAdapter};
use crate::http_client::HttpClient;
use crate::price_service::PriceService;
use crate::source::ServiceId;

/// Immutable, ordered set of registered services.
///
/// The registration order is the fan-out and listing order. Duplicate ids
/// keep the first registration.
pub struct ServiceRegistry {
    services: Vec<Arc<dyn PriceService>>,
    index: HashMap<ServiceId, usize>,
}

impl ServiceRegistry {
    pub fn new(services: Vec<Arc<dyn PriceService>>) -> Self {
        let mut kept: Vec<Arc<dyn PriceService>> = Vec::with_capacity(services.len());
        let mut index = HashMap::with_capacity(services.len());
        for service in services {
            let id = service.id();
            if index.contains_key(&id) {
                tracing::warn!(service = %id, "duplicate service registration ignored");
                continue;
            }
            index.insert(id, kept.len());
            kept.push(service);
        }
        Self {
            services: kept,
            index,
        }
    }

    /// The full adapter set over one shared transport.
    pub fn standard(http: Arc<dyn HttpClient>) -> Self {
        Self::new(vec![
            Arc::new(LivingRoomAdapter::new(http.clone())),
            Arc::new(PaidByCoinsAdapter::new(http.clone())),
            Arc::new(Bit2BillAdapter::new(http)),
        ])
    }

    pub fn services(&self) -> &[Arc<dyn PriceService>] {
        &self.services
    }

    pub fn get(&self, id: ServiceId) -> Option<&Arc<dyn PriceService>> {
        self.index.get(&id).map(|position| &self.services[*position])
    }

    /// Narrows the registry to the requested services, keeping order.
    pub fn subset(&self, ids: &[ServiceId]) -> Self {
        let selected = self
            .services
            .iter()
            .filter(|service| ids.contains(&service.id()))
            .cloned()
            .collect();
        Self::new(selected)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
