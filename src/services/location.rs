//! Position sources.

use async_trait::async_trait;

use crate::error::Result;
use crate::navigation::geo::Coordinates;
use crate::services::Locator;

/// A position that never changes; used by the console binary and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl Locator for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates> {
        Ok(self.0)
    }
}
