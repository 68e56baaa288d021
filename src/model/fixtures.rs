// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nexusmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nexusmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Small outline documents shared by unit tests.

/// One hub `A` with two conditioned variants.
pub(crate) const HUB_TWO_VARIANTS: &str = "A (x=1)\n  B\nA (x=2)\n  C\n";

/// Same-content siblings without conditions stay independent.
pub(crate) const TWINS_NO_CONDITIONS: &str = "A\n  B\nA\n  C\n";

/// A hub nested two levels deep whose variants each carry a multi-level branch.
pub(crate) const NESTED_HUB: &str = "\
Root
  Step (mode=fast)
    Group
      Leaf
  Step (mode=slow)
    Other
";

/// Annotated document with sidecar comments, markers, a fenced block and metadata after the
/// separator.
pub(crate) const ANNOTATED: &str = "\
Start <!-- icon:rocket --> <!-- tags:tg-a,tg-b -->
  >> Review #flow# <!-- ann:needs%20sign-off -->
```
  not a node
```
  Done #common# <!-- fid:flow-1 -->
---
```tag-store
{\"groups\": []}
```
";
