//! Fog scheduling domain models.
//!
//! Provides the data types describing a placement problem (tasks, fog
//! nodes, terminal devices, cloud) and its answer (solution, allocations).
//!
//! # Domain Mappings
//!
//! | fog-schedule | Edge computing | IoT deployment | Mobile offloading |
//! |--------------|----------------|----------------|-------------------|
//! | Task | Workload unit | Sensor batch | App request |
//! | FogNode | Edge server | Gateway | Base-station MEC host |
//! | TerminalDevice | Client | Sensor / controller | Handset |
//! | CloudNode | Data centre | Cloud backend | Remote cloud |

mod device;
mod resource;
mod solution;
mod task;
mod workload;

pub use device::TerminalDevice;
pub use resource::{CloudNode, ComputeNode, FogNode};
pub use solution::{Allocation, Solution, TaskDetail};
pub use task::{Task, MAX_PRIORITY, MIN_PRIORITY};
pub use workload::Workload;
