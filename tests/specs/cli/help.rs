//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let temp = Project::empty();

    temp.munch()
        .args(&["--help"])
        .passes()
        .stdout_has("connect")
        .stdout_has("meals")
        .stdout_has("watch")
        .stdout_has("submit")
        .stdout_has("count")
        .stdout_has("config");
}

#[test]
fn submit_help_names_the_where_argument() {
    let temp = Project::empty();

    temp.munch()
        .args(&["submit", "--help"])
        .passes()
        .stdout_has("<WHAT> <WHERE> <WHY>")
        .stdout_has("--connect");
}

#[test]
fn unknown_command_fails() {
    let temp = Project::empty();

    temp.munch().args(&["eat"]).fails();
}
