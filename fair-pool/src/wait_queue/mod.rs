pub(crate) mod queue;
pub(crate) mod waiter;
pub(crate) mod waker;

pub(crate) use queue::WaitQueue;
pub(crate) use waiter::WaiterState;
