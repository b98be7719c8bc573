/*!
# Graph Algorithms

Algorithms built on top of the graph traits in [`ops`](crate::ops). All of them are re-exported
at the top level of this module, so you can simply do:
```rust
use sgraphs::algo::*;
```
Each algorithm is a configurable struct (altered with builder-style setters before it is run)
and, where it reads naturally, an extension trait on every suitable graph.
Enumerations are provided as **iterators**, making it easy to consume results lazily.
*/

mod esu;
mod isomorphism;
mod motifs;
mod shuffle;
mod traversal;

use crate::{prelude::*, utils::*};
use itertools::Itertools;

pub use esu::*;
pub use isomorphism::*;
pub use motifs::*;
pub use shuffle::*;
pub use traversal::*;
