/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Prelude module that re-exports commonly used types and traits.
//!
//! Instead of importing each type individually, you can use:
//!
//! ```rust
//! use ledgerq::prelude::*;
//! ```

// Core queue types
pub use crate::queue::Queue;
pub use crate::queue::item::Item;
pub use crate::queue::{QueueError, StoreError};

// Configuration
pub use crate::queue::options::{Durability, QueueOptions};

// Storage
pub use crate::queue::store::{MemoryStore, OrderedStore, RedbStore};

// Type aliases for common use cases
pub use crate::{DefaultQueue, MemoryQueue};
