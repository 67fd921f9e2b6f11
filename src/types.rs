use std::fmt;

/// Virtual host every vhost-scoped call targets.
pub const DEFAULT_VHOST: &str = "/";

/// Exchanges the broker declares itself. They are never listed nor deleted.
pub const RESERVED_EXCHANGE_PREFIX: &str = "amq.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Queue,
    Exchange,
    Connection,
}

impl ResourceKind {
    pub fn collection(self) -> &'static str {
        match self {
            ResourceKind::Queue => "queues",
            ResourceKind::Exchange => "exchanges",
            ResourceKind::Connection => "connections",
        }
    }

    /// Connections live outside of any vhost in the management API paths.
    pub fn is_vhost_scoped(self) -> bool {
        !matches!(self, ResourceKind::Connection)
    }

    /// Path segments addressing a single resource, relative to the base URL.
    pub(crate) fn item_segments(self, name: &str) -> Vec<&str> {
        if self.is_vhost_scoped() {
            vec![self.collection(), DEFAULT_VHOST, name]
        } else {
            vec![self.collection(), name]
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Queue => "queue",
            ResourceKind::Exchange => "exchange",
            ResourceKind::Connection => "connection",
        };
        f.write_str(name)
    }
}

pub fn is_reserved_exchange(name: &str) -> bool {
    name.is_empty() || name.starts_with(RESERVED_EXCHANGE_PREFIX)
}
