mod common;
mod queue_dict;
mod shared_guard_dict;
mod spin;
mod value_guard_dict;
