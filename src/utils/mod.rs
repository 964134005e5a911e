/*!
# Utilities

Supporting structures that are not tied to a single matcher, currently the
scored [`MaxHeap`](self::heap::MaxHeap).
*/

pub mod heap;

pub use heap::MaxHeap;
