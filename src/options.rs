// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// Rendering options.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Enables anti-aliasing of shape edges.
    ///
    /// Default: enabled
    pub anti_alias: bool,
}

impl Default for RenderOptions {
    fn default() -> RenderOptions {
        RenderOptions { anti_alias: true }
    }
}
