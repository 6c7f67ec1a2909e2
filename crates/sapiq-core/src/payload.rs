use std::fmt::Debug;
use std::hash::Hash;

/// Payload type carried by queue entries: the name, the data items and the
/// handler's return value are all of this type.
///
/// `String` and `Vec<u8>` are the two flavors the queues were built for;
/// anything cheap to clone with value equality works. `Default` supplies
/// the value delivered when a handler faults.
pub trait Payload: Clone + Eq + Hash + Default + Debug + Send + Sync + 'static {}

impl<T> Payload for T where T: Clone + Eq + Hash + Default + Debug + Send + Sync + 'static {}
