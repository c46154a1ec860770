//! Cross-subsystem choreography over in-memory adapters.

#[cfg(test)]
mod aggregation;
#[cfg(test)]
mod collections;
#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod lifecycle;
