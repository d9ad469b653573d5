use pretty_assertions::assert_eq;

use super::init_tracing;

#[test]
fn init_tracing_answers_the_same_every_time() {
    let first = init_tracing();
    for _ in 0..3 {
        assert_eq!(init_tracing(), first);
    }
}
