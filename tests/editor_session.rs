use std::fs;
use std::path::Path;

use rustedbytes_editor::config::ToolSettings;
use rustedbytes_editor::editor::command::{Arity, CommandSpec, DispatchOutcome, HandlerFuture, Tier};
use rustedbytes_editor::editor::shell::ShellCall;
use rustedbytes_editor::editor::tree::SortType;
use rustedbytes_editor::{EditorConfig, EditorError, EditorRequest, EditorSession};
use tempfile::TempDir;

fn session_in(dir: &Path) -> EditorSession {
    EditorSession::new(EditorConfig {
        root_dir: dir.to_path_buf(),
        ..EditorConfig::default()
    })
}

async fn run(session: &mut EditorSession, cmd: &str) {
    session
        .update(&EditorRequest::command(cmd))
        .await
        .expect("listing failed");
}

fn session_with_echo_tools(dir: &Path) -> EditorSession {
    EditorSession::new(EditorConfig {
        root_dir: dir.to_path_buf(),
        tools: ToolSettings {
            lint: vec!["echo".to_string(), "lint".to_string()],
            format: vec!["echo".to_string(), "format".to_string()],
            format_extension: "py".to_string(),
        },
        ..EditorConfig::default()
    })
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn output_lines(session: &EditorSession) -> Vec<String> {
    session.shell.log().lines().to_vec()
}

fn shadowed_rm2<'a>(session: &'a mut EditorSession, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        session.log().add_line("shadowed");
        Ok::<(), EditorError>(())
    })
}

#[tokio::test]
async fn save_creates_then_refuses_to_clobber() {
    let temp = TempDir::new().unwrap();
    let mut session = session_in(temp.path());
    let target = temp.path().join("test.py");

    let request = EditorRequest {
        cmd: Some("save test.py".to_string()),
        code: Some("print(1)\n".to_string()),
        ..EditorRequest::default()
    };
    session.update(&request).await.unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "print(1)\n");
    assert_eq!(session.state.opening_file.as_deref(), Some(target.as_path()));
    assert_eq!(session.state.file_name, "test.py");
    assert_eq!(session.state.file_type, "python");
    assert_eq!(
        output_lines(&session).last().unwrap(),
        &format!("new file saved: {}", target.display())
    );

    let request = EditorRequest {
        cmd: Some("save test.py".to_string()),
        code: Some("print(2)\n".to_string()),
        ..EditorRequest::default()
    };
    session.update(&request).await.unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "print(1)\n");
    assert_eq!(
        output_lines(&session).last().unwrap(),
        &format!("file already exists: {}", target.display())
    );
}

#[tokio::test]
async fn save_without_name_overwrites_open_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("notes.txt");
    fs::write(&target, "old").unwrap();
    let mut session = session_in(temp.path());

    session
        .update(&EditorRequest {
            opening_file: Some("notes.txt".to_string()),
            ..EditorRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(session.state.code, "old");

    session
        .update(&EditorRequest {
            cmd: Some("save".to_string()),
            code: Some("new".to_string()),
            ..EditorRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    assert_eq!(
        output_lines(&session).last().unwrap(),
        &format!("file overwritten: {}", target.display())
    );
}

#[tokio::test]
async fn save_without_file_asks_for_a_name() {
    let temp = TempDir::new().unwrap();
    let mut session = session_in(temp.path());

    run(&mut session, "save").await;

    assert_eq!(
        output_lines(&session).last().unwrap(),
        "specify a file name or open a file"
    );
    assert!(fs::read_dir(temp.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn submitted_code_wins_over_file_contents() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.rs"), "fn main() {}").unwrap();
    let mut session = session_in(temp.path());

    session
        .update(&EditorRequest {
            opening_file: Some("a.rs".to_string()),
            code: Some("edited".to_string()),
            ..EditorRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(session.state.code, "edited");
    assert_eq!(session.state.file_type, "rust");

    session.update(&EditorRequest::default()).await.unwrap();
    assert_eq!(session.state.code, "fn main() {}");
}

#[tokio::test]
async fn missing_open_file_shows_placeholder() {
    let temp = TempDir::new().unwrap();
    let mut session = session_in(temp.path());

    session
        .update(&EditorRequest {
            opening_file: Some("gone.py".to_string()),
            ..EditorRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(session.state.code, "file not found");
}

#[tokio::test]
async fn rm2_reports_missing_path() {
    let temp = TempDir::new().unwrap();
    let mut session = session_in(temp.path());

    run(&mut session, "rm2 nothing.txt").await;

    assert_eq!(
        output_lines(&session).last().unwrap(),
        &format!("not found: {}", temp.path().join("nothing.txt").display())
    );
}

#[tokio::test]
async fn rm2_removes_files_and_directories() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.txt"), "a").unwrap();
    fs::create_dir_all(temp.path().join("sub/inner")).unwrap();
    fs::write(temp.path().join("sub/inner/b.txt"), "b").unwrap();
    let mut session = session_in(temp.path());

    run(&mut session, "rm2 a.txt").await;
    run(&mut session, "rm2 sub").await;

    assert!(!temp.path().join("a.txt").exists());
    assert!(!temp.path().join("sub").exists());
    let lines = output_lines(&session);
    assert!(lines[0].starts_with("file removed: "));
    assert!(lines[1].starts_with("directory removed: "));
}

#[tokio::test]
async fn arity_mismatch_is_reported() {
    let temp = TempDir::new().unwrap();
    let mut session = session_in(temp.path());

    run(&mut session, "rm2 a b").await;

    assert_eq!(
        output_lines(&session).last().unwrap(),
        "arguments do not match: rm2 takes 1 argument but 2 were given"
    );
    assert!(matches!(
        session.command.last_outcome(),
        DispatchOutcome::ArgMismatch { .. }
    ));
}

#[tokio::test]
async fn repeated_command_is_recorded_once() {
    let temp = TempDir::new().unwrap();
    let mut session = session_in(temp.path());

    run(&mut session, "history").await;
    run(&mut session, "history").await;
    run(&mut session, "reverse").await;
    run(&mut session, "history").await;

    assert_eq!(
        session.command.history.entries(),
        ["history", "reverse", "history"]
    );

    run(&mut session, "deletecmd").await;
    assert!(session.command.history.entries().is_empty());
    assert_eq!(
        output_lines(&session).last().unwrap(),
        "command history cleared"
    );
}

#[tokio::test]
async fn blank_command_changes_nothing() {
    let temp = TempDir::new().unwrap();
    let mut session = session_in(temp.path());

    run(&mut session, "   ").await;

    assert!(session.command.history.entries().is_empty());
    assert!(session.shell.calls().is_empty());
    assert_eq!(session.command.last_outcome(), &DispatchOutcome::Idle);
}

#[tokio::test]
async fn user_command_shadows_builtin_until_unregistered() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("keep.txt"), "x").unwrap();
    let mut session = session_in(temp.path());

    session.command.registry.register(
        Tier::User,
        CommandSpec {
            name: "rm2",
            handler: shadowed_rm2,
            arity: Arity::exactly(1),
            doc: "shadow",
        },
    );

    run(&mut session, "rm2 keep.txt").await;
    assert!(temp.path().join("keep.txt").exists());
    assert_eq!(output_lines(&session).last().unwrap(), "shadowed");
    assert_eq!(
        session.command.last_outcome(),
        &DispatchOutcome::Dispatched {
            name: "rm2".to_string(),
            tier: Tier::User,
        }
    );

    session.command.registry.unregister(Tier::User, "rm2");
    run(&mut session, "rm2 keep.txt").await;
    assert!(!temp.path().join("keep.txt").exists());
    assert_eq!(
        session.command.last_outcome(),
        &DispatchOutcome::Dispatched {
            name: "rm2".to_string(),
            tier: Tier::Builtin,
        }
    );
}

#[cfg(unix)]
#[tokio::test]
async fn unknown_command_falls_back_to_shell() {
    let temp = TempDir::new().unwrap();
    let mut session = session_in(temp.path());

    run(&mut session, "foobar123").await;

    assert_eq!(
        session.shell.calls(),
        [
            ShellCall::ChangeDir(temp.path().to_path_buf()),
            ShellCall::Run("foobar123".to_string()),
        ]
    );
    assert!(session.command.output.contains("foobar123"));
    assert_eq!(
        session.command.last_outcome(),
        &DispatchOutcome::ShellFallback {
            cmd: "foobar123".to_string()
        }
    );
}

#[cfg(unix)]
#[tokio::test]
async fn shell_runs_in_current_directory() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("sub")).unwrap();
    fs::write(temp.path().join("sub/marker.txt"), "").unwrap();
    let mut session = session_in(temp.path());

    run(&mut session, "cd sub").await;
    run(&mut session, "ls").await;

    assert!(session.command.output.contains("marker.txt"));
}

#[tokio::test]
async fn cd_moves_editor_and_shell() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("sub")).unwrap();
    let mut session = session_in(temp.path());
    let sub = temp.path().join("sub");

    run(&mut session, "cd sub").await;
    assert_eq!(session.state.current_dir, sub);
    assert_eq!(session.shell.cwd(), sub.as_path());
    assert_eq!(
        output_lines(&session).last().unwrap(),
        &format!("current directory: {}", sub.display())
    );

    run(&mut session, "cd missing").await;
    assert_eq!(session.state.current_dir, sub);
    assert_eq!(
        output_lines(&session).last().unwrap(),
        &format!("not a directory: {}", sub.join("missing").display())
    );

    run(&mut session, "cd ..").await;
    assert_eq!(session.state.current_dir, temp.path());
}

#[tokio::test]
async fn invalid_current_dir_request_is_ignored() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("file.txt"), "").unwrap();
    let mut session = session_in(temp.path());

    session
        .update(&EditorRequest {
            current_dir: Some("file.txt".to_string()),
            ..EditorRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(session.state.current_dir, temp.path());
}

#[tokio::test]
async fn sort_by_size_and_reverse() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a"), vec![0u8; 10]).unwrap();
    fs::write(temp.path().join("b"), vec![0u8; 5]).unwrap();
    fs::write(temp.path().join("c"), vec![0u8; 20]).unwrap();
    let mut session = session_in(temp.path());

    run(&mut session, "set_sort size").await;
    assert_eq!(session.tree.sort_type, SortType::Size);
    let sizes: Vec<u64> = session.tree.files.iter().map(|f| f.size).collect();
    assert_eq!(sizes, [5, 10, 20]);

    run(&mut session, "reverse").await;
    let sizes: Vec<u64> = session.tree.files.iter().map(|f| f.size).collect();
    assert_eq!(sizes, [20, 10, 5]);
    assert_eq!(output_lines(&session).last().unwrap(), "reverse order on");

    run(&mut session, "set_sort bogus").await;
    assert_eq!(session.tree.sort_type, SortType::Size);
}

#[tokio::test]
async fn view_lists_parent_first() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("b_dir")).unwrap();
    fs::create_dir(temp.path().join("a_dir")).unwrap();
    fs::write(temp.path().join("x.txt"), vec![0u8; 1500]).unwrap();
    let mut session = session_in(temp.path());

    session.update(&EditorRequest::default()).await.unwrap();
    let view = session.view();

    let names: Vec<&str> = view.dirs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["..", "a_dir", "b_dir"]);
    assert_eq!(view.dirs[0].shallow_size, None);
    assert_eq!(view.files.len(), 1);
    assert_eq!(view.files[0].human_size, "1.5 KB");
    assert!(view.user_commands.iter().any(|c| c.name == "now"));
    assert_eq!(view.builtin_commands[0].name, "save");
}

#[tokio::test]
async fn listing_failure_is_an_error() {
    let temp = TempDir::new().unwrap();
    let doomed = temp.path().join("doomed");
    fs::create_dir(&doomed).unwrap();
    let mut session = session_in(temp.path());

    session.update_dir(Some("doomed"));
    fs::remove_dir(&doomed).unwrap();

    let err = session.update(&EditorRequest::default()).await.unwrap_err();
    assert!(matches!(err, EditorError::Listing { .. }));
}

#[tokio::test]
async fn encodings_round_trip_through_save_and_open() {
    let temp = TempDir::new().unwrap();
    let mut session = session_in(temp.path());

    run(&mut session, "save_encoding klingon").await;
    assert_eq!(
        output_lines(&session).last().unwrap(),
        "unknown encoding: klingon"
    );
    assert_eq!(session.state.save_encoding, encoding_rs::UTF_8);

    run(&mut session, "save_encoding shift_jis").await;
    session
        .update(&EditorRequest {
            cmd: Some("save sjis.txt".to_string()),
            code: Some("日本語".to_string()),
            ..EditorRequest::default()
        })
        .await
        .unwrap();

    let (expected, _, _) = encoding_rs::SHIFT_JIS.encode("日本語");
    assert_eq!(fs::read(temp.path().join("sjis.txt")).unwrap(), expected.as_ref());

    // UTF-8 cannot decode the Shift_JIS bytes
    session.update(&EditorRequest::default()).await.unwrap();
    assert_eq!(session.state.code, "could not decode with UTF-8");

    // the buffer is read before the command runs, so it shows on the next request
    run(&mut session, "open_encoding shift_jis").await;
    session.update(&EditorRequest::default()).await.unwrap();
    assert_eq!(session.state.code, "日本語");
}

#[tokio::test]
async fn mv2_and_cp2_handle_files_and_directories() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.txt"), "a").unwrap();
    fs::create_dir_all(temp.path().join("src/nested")).unwrap();
    fs::write(temp.path().join("src/nested/f.txt"), "f").unwrap();
    fs::create_dir(temp.path().join("dest")).unwrap();
    let mut session = session_in(temp.path());

    run(&mut session, "cp2 src copy").await;
    assert_eq!(
        fs::read_to_string(temp.path().join("copy/nested/f.txt")).unwrap(),
        "f"
    );
    assert_eq!(output_lines(&session).last().unwrap(), "copied: src -> copy");

    run(&mut session, "mv2 a.txt dest").await;
    assert!(!temp.path().join("a.txt").exists());
    assert_eq!(fs::read_to_string(temp.path().join("dest/a.txt")).unwrap(), "a");

    run(&mut session, "cp2 dest/a.txt dest").await;
    assert_eq!(
        output_lines(&session).last().unwrap(),
        &format!("already exists: {}", temp.path().join("dest/a.txt").display())
    );

    run(&mut session, "mv2 ghost.txt dest").await;
    assert_eq!(
        output_lines(&session).last().unwrap(),
        &format!("not found: {}", temp.path().join("ghost.txt").display())
    );
}

#[tokio::test]
async fn freeze_and_unfreeze_round_trip() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("project/src")).unwrap();
    fs::write(temp.path().join("project/src/lib.rs"), "pub fn f() {}").unwrap();
    let mut session = session_in(temp.path());

    run(&mut session, "freeze project gztar").await;
    let archive = temp.path().join("project.tar.gz");
    assert!(archive.is_file());

    fs::remove_dir_all(temp.path().join("project")).unwrap();
    run(&mut session, "unfreeze project.tar.gz").await;
    assert_eq!(
        fs::read_to_string(temp.path().join("project/src/lib.rs")).unwrap(),
        "pub fn f() {}"
    );
    assert_eq!(
        output_lines(&session).last().unwrap(),
        &format!("decompressed: {}", archive.display())
    );

    run(&mut session, "freeze project rar").await;
    assert!(output_lines(&session).last().unwrap().starts_with("unsupported archive kind"));
}

#[tokio::test]
async fn size2_reports_aggregate_size() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("data/deep")).unwrap();
    fs::write(temp.path().join("data/one"), vec![0u8; 1000]).unwrap();
    fs::write(temp.path().join("data/deep/two"), vec![0u8; 500]).unwrap();
    let mut session = session_in(temp.path());

    run(&mut session, "size2 data/one").await;
    assert_eq!(output_lines(&session).last().unwrap(), "data/one: 1.0 KB - 1000");

    run(&mut session, "size2 data").await;
    assert_eq!(output_lines(&session).last().unwrap(), "data: 1.5 KB - 1500");

    run(&mut session, "size2 nowhere").await;
    assert!(output_lines(&session).last().unwrap().starts_with("not found: "));
}

#[tokio::test]
async fn deletelog_clears_output() {
    let temp = TempDir::new().unwrap();
    let mut session = session_in(temp.path());

    run(&mut session, "reverse").await;
    run(&mut session, "deletelog").await;

    assert_eq!(output_lines(&session), ["output cleared"]);
    assert_eq!(session.command.output, "output cleared");
}

#[tokio::test]
async fn cp2_refuses_to_copy_a_directory_into_itself() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("d")).unwrap();
    fs::write(temp.path().join("d/f.txt"), "f").unwrap();
    let mut session = session_in(temp.path());

    run(&mut session, "cp2 d d/sub").await;
    assert_eq!(
        output_lines(&session).last().unwrap(),
        &format!("cannot copy into itself: {}", temp.path().join("d/sub").display())
    );
    assert!(!temp.path().join("d/sub").exists());

    run(&mut session, "cp2 d d").await;
    assert_eq!(
        output_lines(&session).last().unwrap(),
        &format!("cannot copy into itself: {}", temp.path().join("d/d").display())
    );
    assert!(!temp.path().join("d/d").exists());

    run(&mut session, "mv2 d d/sub").await;
    assert!(temp.path().join("d/f.txt").exists());
}

#[tokio::test]
async fn freeze_current_directory_leaves_archive_out() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("proj");
    fs::create_dir(&project).unwrap();
    fs::write(project.join("a.txt"), "a").unwrap();
    let mut session = session_in(&project);

    run(&mut session, "freeze .").await;

    let archive = project.join("proj.zip");
    let reader = zip::ZipArchive::new(fs::File::open(&archive).unwrap()).unwrap();
    let mut names: Vec<&str> = reader.file_names().collect();
    names.sort();
    assert_eq!(names, ["proj/", "proj/a.txt"]);
}

#[tokio::test]
async fn check_without_target_asks_for_a_name() {
    let temp = TempDir::new().unwrap();
    let mut session = session_with_echo_tools(temp.path());

    run(&mut session, "check").await;
    assert_eq!(
        output_lines(&session).last().unwrap(),
        "specify a file name or open a file"
    );

    run(&mut session, "check missing.py").await;
    assert_eq!(
        output_lines(&session).last().unwrap(),
        &format!("not found: {}", temp.path().join("missing.py").display())
    );
    assert!(session.shell.calls().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn check_runs_linter_on_named_or_open_file() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("main.py");
    fs::write(&script, "print(1)\n").unwrap();
    let mut session = session_with_echo_tools(temp.path());

    run(&mut session, "check main.py").await;
    let argv = vec!["echo".to_string(), "lint".to_string(), path_arg(&script)];
    assert_eq!(session.shell.calls(), [ShellCall::Exec(argv.clone())]);
    assert_eq!(
        output_lines(&session).last().unwrap(),
        &format!("lint {}", script.display())
    );

    session
        .update(&EditorRequest {
            opening_file: Some("main.py".to_string()),
            cmd: Some("check".to_string()),
            ..EditorRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(session.shell.calls(), [ShellCall::Exec(argv)]);
}

#[tokio::test]
async fn auto_rejects_missing_and_foreign_targets() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("notes.txt"), "").unwrap();
    let mut session = session_with_echo_tools(temp.path());

    run(&mut session, "auto gone.py").await;
    assert_eq!(
        output_lines(&session).last().unwrap(),
        &format!("not found: {}", temp.path().join("gone.py").display())
    );

    run(&mut session, "auto notes.txt").await;
    assert_eq!(
        output_lines(&session).last().unwrap(),
        &format!(
            "not a py file or directory: {}",
            temp.path().join("notes.txt").display()
        )
    );
    assert!(session.shell.calls().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn auto_formats_file_or_matching_files_in_directory() {
    let temp = TempDir::new().unwrap();
    let pkg = temp.path().join("pkg");
    fs::create_dir_all(pkg.join("nested")).unwrap();
    fs::write(pkg.join("b.py"), "").unwrap();
    fs::write(pkg.join("a.py"), "").unwrap();
    fs::write(pkg.join("readme.md"), "").unwrap();
    fs::write(pkg.join("nested/deep.py"), "").unwrap();
    let mut session = session_with_echo_tools(temp.path());

    run(&mut session, "auto pkg/a.py").await;
    assert_eq!(
        session.shell.calls(),
        [ShellCall::Exec(vec![
            "echo".to_string(),
            "format".to_string(),
            path_arg(&pkg.join("a.py")),
        ])]
    );

    run(&mut session, "auto pkg").await;
    let formatted: Vec<ShellCall> = ["a.py", "b.py"]
        .iter()
        .map(|name| {
            ShellCall::Exec(vec![
                "echo".to_string(),
                "format".to_string(),
                path_arg(&pkg.join(name)),
            ])
        })
        .collect();
    assert_eq!(session.shell.calls(), formatted.as_slice());
    assert_eq!(
        output_lines(&session).last().unwrap(),
        &format!("format {}", pkg.join("b.py").display())
    );
}
