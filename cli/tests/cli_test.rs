use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const REGISTRY_TSV: &str = "\
id\tgender\tethnicity\tmajor1\tschool\ttransfer\tfirst_term
1\tFemale\tAsian\tCS\tUENG\t0\t201409
2\tMale\tWhite\tEE\tUENG\t1\t201309
3\tFemale\tBlack\tBIO\tULSA\t0\t201409
4\tMale\tAsian\tMATH\tULSA\t0\t201209
";

fn interseg(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_interseg"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run interseg")
}

fn build_registry(dir: &Path) -> String {
    let tsv = dir.join("students.tsv");
    fs::write(&tsv, REGISTRY_TSV).unwrap();
    let archive = dir.join("students.isrg");
    let output = interseg(
        dir,
        &["build-archive", tsv.to_str().unwrap(), archive.to_str().unwrap()],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    archive.to_str().unwrap().to_string()
}

#[test]
fn test_counts_from_built_archive() {
    let dir = tempdir().unwrap();
    let archive = build_registry(dir.path());

    let output = interseg(dir.path(), &["--registry", &archive, "counts", "school"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "UENG\t2\nULSA\t2\n");
}

#[test]
fn test_segment_vertex_file() {
    let dir = tempdir().unwrap();
    let archive = build_registry(dir.path());
    let input = dir.path().join("vertices.tsv");
    fs::write(&input, "1\t0.5\n3\t2\n").unwrap();

    let output = interseg(
        dir.path(),
        &["--registry", &archive, "segment", "transfer", input.to_str().unwrap()],
    );
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Non-transfer\t0.5\nNon-transfer\t2\n"
    );
}

#[test]
fn test_unknown_member_exits_with_lookup_status() {
    let dir = tempdir().unwrap();
    let archive = build_registry(dir.path());
    let input = dir.path().join("vertices.tsv");
    fs::write(&input, "42\t1\n").unwrap();

    let output = interseg(
        dir.path(),
        &["--registry", &archive, "segment", "school", input.to_str().unwrap()],
    );
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_corrupt_archive_exits_with_data_loss_status() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("broken.isrg");
    fs::write(&archive, b"not an archive").unwrap();

    let output = interseg(
        dir.path(),
        &["--registry", archive.to_str().unwrap(), "counts", "school"],
    );
    assert_eq!(output.status.code(), Some(2));
}

fn write_input(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_segment_streams_rows_until_a_bad_line() {
    let dir = tempdir().unwrap();
    let archive = build_registry(dir.path());
    let input = write_input(dir.path(), "vertices.tsv", "1\t0.5\nbad\t1\n3\t2\n");

    let output = interseg(dir.path(), &["--registry", &archive, "segment", "transfer", &input]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Non-transfer\t0.5\n");
}

#[test]
fn test_rpd_for_individual() {
    let dir = tempdir().unwrap();
    let archive = build_registry(dir.path());
    let input = write_input(dir.path(), "student.tsv", "1\t1\n2\t1\n3\t1\n");

    let output = interseg(
        dir.path(),
        &["--registry", &archive, "rpd", "school", "unweighted", "UENG", &input],
    );
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        &lines[..4],
        ["UENG\t2", "not UENG\t1", "population\t2", "expected\t1.5"]
    );
    let rpd: f64 = lines[4].strip_prefix("rpd\t").unwrap().parse().unwrap();
    // |2(2 - 1.5) / 3.5|
    assert!((rpd - 1.0 / 3.5).abs() < 1e-12);
}

#[test]
fn test_rpd_network_text_and_json() {
    let dir = tempdir().unwrap();
    let archive = build_registry(dir.path());
    let input = write_input(dir.path(), "network.tsv", "UENG\tULSA\t5\n");

    let text = stdout(&interseg(
        dir.path(),
        &["--registry", &archive, "rpd-network", "school", &input],
    ));
    assert!(text.starts_with("\tUENG\tULSA\n"));
    assert_eq!(text.lines().count(), 3);

    let json = stdout(&interseg(
        dir.path(),
        &["--registry", &archive, "rpd-network", "school", &input, "--json"],
    ));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["mode"], "matrix");
    assert_eq!(value["data"]["labels"], serde_json::json!(["UENG", "ULSA"]));
    // expected = 2/4 * 5 = 2.5, rpd(5, 2.5) = 2/3
    let cell = value["data"]["values"][1][0].as_f64().unwrap();
    assert!((cell - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(value["data"]["values"][0][0].as_f64(), Some(0.0));
}

fn segment_values(label: &str, start: usize, len: usize) -> String {
    (start..start + len)
        .map(|value| format!("{}\t{}\n", label, value))
        .collect()
}

#[test]
fn test_ks_matrix_marks_insignificant_cells_and_drops_small_segments() {
    let dir = tempdir().unwrap();
    let contents = format!(
        "{}{}{}",
        segment_values("A", 0, 40),
        segment_values("B", 1000, 40),
        segment_values("C", 0, 3)
    );
    let input = write_input(dir.path(), "segments.tsv", &contents);

    let text = stdout(&interseg(
        dir.path(),
        &["ks", "unweighted", "--threshold", "10", &input],
    ));
    assert_eq!(text, "\tA\tB\nA\t-\t1.00\nB\t1.00\t-\n");
}

#[test]
fn test_ks_top_pairs_above_display_threshold() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("config")).unwrap();
    fs::write(
        dir.path().join("config/default.toml"),
        "[analysis]\ndisplay_threshold = 1\n",
    )
    .unwrap();
    let contents = format!(
        "{}{}{}",
        segment_values("A", 0, 40),
        segment_values("B", 20, 40),
        segment_values("C", 1000, 40)
    );
    let input = write_input(dir.path(), "segments.tsv", &contents);

    let text = stdout(&interseg(
        dir.path(),
        &["ks", "weighted", "--threshold", "10", &input],
    ));
    assert_eq!(
        text,
        "A || C || 1.00 with p-value: 0.00\n\
         B || C || 1.00 with p-value: 0.00\n\
         A || B || 0.50 with p-value: 0.00\n"
    );

    let json = stdout(&interseg(
        dir.path(),
        &["ks", "weighted", "--threshold", "10", "--json", &input],
    ));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["mode"], "top_pairs");
    assert_eq!(value["data"].as_array().unwrap().len(), 3);
}

#[test]
fn test_diversity_prefixes_file_names_for_several_files() {
    let dir = tempdir().unwrap();
    let archive = build_registry(dir.path());
    let mixed = write_input(dir.path(), "mixed.tsv", "1\t1\n3\t1\n");
    let single = write_input(dir.path(), "single.tsv", "1\t1\n2\t1\n");

    let text = stdout(&interseg(
        dir.path(),
        &[
            "--registry", &archive, "diversity", "unweighted", "--segmenter", "school", &mixed,
            &single,
        ],
    ));
    assert_eq!(text, format!("{}\t0.5\n{}\t1\n", mixed, single));

    let text = stdout(&interseg(
        dir.path(),
        &["--registry", &archive, "diversity", "unweighted", "--segmenter", "school", &mixed],
    ));
    assert_eq!(text, "0.5\n");
}

#[test]
fn test_network_diversity_per_vertex() {
    let dir = tempdir().unwrap();
    let input = write_input(dir.path(), "edges.tsv", "a\tb\t1\na\tc\t3\n");

    let text = stdout(&interseg(dir.path(), &["network-diversity", &input]));
    assert_eq!(text, "a\t0.625\nb\t1\nc\t1\n");
}
