#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::rigidbody::Body;

/// Runs `f` on every body, on the rayon pool when `parallel` is set.
///
/// Only for phases where each body is touched independently. Without the
/// `parallel` feature the flag is ignored.
pub fn for_each_body<F>(bodies: &mut [Body], parallel: bool, f: F)
where
    F: Fn(&mut Body) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    if parallel {
        bodies.par_iter_mut().for_each(f);
        return;
    }

    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    bodies.iter_mut().for_each(f);
}
