//! Given steps for task board BDD scenarios.

use super::world::{TaskBoardWorld, run_async};
use rstest_bdd_macros::given;

#[given("an empty task board")]
fn empty_task_board(world: &TaskBoardWorld) -> Result<(), eyre::Report> {
    let tasks = run_async(world.app.tasks());
    eyre::ensure!(tasks.is_empty(), "expected no tasks, found {}", tasks.len());
    Ok(())
}

#[given(r#"a task titled "{title}" exists"#)]
fn task_exists(world: &mut TaskBoardWorld, title: String) {
    let task = run_async(world.app.create_task(&title));
    world.current_task = Some(task);
}
