use std::fs;
use std::path::Path;

/// Every `.rs` file under `src/<subdir>`, as (crate-relative path, contents).
fn sources_under(subdir: &str) -> Vec<(String, String)> {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut pending = vec![manifest.join("src").join(subdir)];
    let mut found = Vec::new();

    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for path in entries.flatten().map(|e| e.path()) {
            if path.is_dir() {
                pending.push(path);
                continue;
            }
            if path.extension().is_some_and(|ext| ext == "rs") {
                let shown = path
                    .strip_prefix(manifest)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .replace('\\', "/");
                found.push((shown, fs::read_to_string(&path).unwrap_or_default()));
            }
        }
    }
    found.sort();
    found
}

fn offenders(subdir: &str, needles: &[&str]) -> Vec<String> {
    sources_under(subdir)
        .into_iter()
        .filter_map(|(path, body)| {
            let hits: Vec<&str> = needles
                .iter()
                .copied()
                .filter(|n| body.contains(n))
                .collect();
            (!hits.is_empty()).then(|| format!("{path}: {}", hits.join(", ")))
        })
        .collect()
}

#[test]
fn system_layer_knows_nothing_about_http() {
    let bad = offenders("system", &["crate::api", "actix_web"]);
    assert!(bad.is_empty(), "system depends on HTTP:\n{}", bad.join("\n"));
}

#[test]
fn api_goes_through_system_not_platform() {
    let bad = offenders("api", &["system::platform", "nix::", "procfs::"]);
    assert!(bad.is_empty(), "api bypasses system:\n{}", bad.join("\n"));
}

#[test]
fn os_cfg_lives_only_in_platform() {
    let bad: Vec<String> = offenders("", &["target_os", "cfg(unix)", "cfg(windows)"])
        .into_iter()
        .filter(|line| !line.starts_with("src/system/platform/"))
        .collect();
    assert!(bad.is_empty(), "OS cfg outside platform:\n{}", bad.join("\n"));
}
