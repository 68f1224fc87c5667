//! End-to-end conversion tests against scratch bundles.

use oci2docker::converter::{
    Converter, CopyPolicy, ExtractDefaults, Outcome, SettingsBuilder,
};
use oci2docker::ConvertError;
use std::path::Path;
use tempfile::TempDir;

fn bundle_with_app() -> TempDir {
    let bundle = tempfile::tempdir().unwrap();
    let bin = bundle.path().join("rootfs/bin");
    std::fs::create_dir_all(&bin).unwrap();
    std::fs::write(bin.join("myapp"), b"#!/bin/sh\nexec sleep 1\n").unwrap();
    std::fs::create_dir_all(bundle.path().join("rootfs/etc")).unwrap();
    std::fs::write(bundle.path().join("rootfs/etc/hostname"), b"app\n").unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(bin.join("myapp"), std::fs::Permissions::from_mode(0o755))
            .unwrap();
    }
    bundle
}

fn converter(temp_root: &Path, policy: CopyPolicy) -> Converter {
    let settings = SettingsBuilder::new()
        .temp_root(temp_root)
        .copy_policy(policy)
        .verify(true)
        .build();
    Converter::new(settings).unwrap()
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn converts_bundle_without_spec_to_shell_image() {
    let bundle = bundle_with_app();
    let temp_root = tempfile::tempdir().unwrap();

    let outcome = converter(temp_root.path(), CopyPolicy::Strict)
        .convert(bundle.path())
        .await
        .unwrap();
    let report = match outcome {
        Outcome::Converted(report) => report,
        other => panic!("expected a build context, got {other:?}"),
    };

    let context = report.build_context.path();
    assert!(context.starts_with(temp_root.path()));
    assert!(!context.starts_with(bundle.path()));
    assert_eq!(entries(context), vec!["Dockerfile", "rootfs"]);

    let dockerfile = std::fs::read_to_string(report.build_context.dockerfile_path()).unwrap();
    assert_eq!(dockerfile, report.dockerfile);
    assert!(dockerfile.starts_with("FROM scratch\n"));
    assert!(dockerfile.contains("ENTRYPOINT [\"/bin/sh\"]\n"));
    assert!(dockerfile.contains("ADD rootfs .\n"));
    assert!(!dockerfile.contains("EXPOSE"));

    let copied = context.join("rootfs/bin/myapp");
    assert_eq!(
        std::fs::read(&copied).unwrap(),
        b"#!/bin/sh\nexec sleep 1\n"
    );
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let source_mode = std::fs::metadata(bundle.path().join("rootfs/bin/myapp"))
            .unwrap()
            .permissions()
            .mode();
        let staged_mode = std::fs::metadata(&copied).unwrap().permissions().mode();
        assert_eq!(source_mode, staged_mode);

        let rootfs_mode = std::fs::metadata(context.join("rootfs"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(rootfs_mode & 0o777, 0o755);
    }

    let digest = report.build_context.digest().unwrap();
    assert!(digest.matches());
    assert!(report.warnings.is_empty());
    assert_eq!(report.descriptor.rootfs_path, bundle.path().join("rootfs"));
    assert_eq!(
        report.suggested_command(),
        format!("docker build -t /bin/sh {}", context.display())
    );
}

#[tokio::test]
async fn uses_entrypoint_and_ports_from_config_json() {
    let bundle = bundle_with_app();
    std::fs::write(
        bundle.path().join("config.json"),
        r#"{
            "ociVersion": "1.0.2",
            "process": {
                "cwd": "/",
                "args": ["/bin/myapp", "--serve"],
                "env": ["MODE=prod"]
            },
            "annotations": {
                "org.opencontainers.image.exposedPorts": "8080/tcp,9090/tcp"
            }
        }"#,
    )
    .unwrap();
    let temp_root = tempfile::tempdir().unwrap();

    let Outcome::Converted(report) = converter(temp_root.path(), CopyPolicy::Lenient)
        .convert(bundle.path())
        .await
        .unwrap()
    else {
        panic!("expected a build context");
    };

    let dockerfile = &report.dockerfile;
    assert!(dockerfile.contains("ENTRYPOINT [\"/bin/myapp\"]\n"));
    assert!(dockerfile.contains("CMD [\"--serve\"]\n"));
    assert!(dockerfile.contains("ENV MODE=\"prod\"\n"));
    assert!(dockerfile.contains("EXPOSE 8080/tcp 9090/tcp\n"));
    assert!(!dockerfile.contains("WORKDIR"));
    assert!(report.suggested_command().starts_with("docker build -t /bin/myapp "));
}

#[tokio::test]
async fn missing_bundle_requests_help_without_writing() {
    let temp_root = tempfile::tempdir().unwrap();
    let missing = temp_root.path().join("does/not/exist");

    let outcome = converter(temp_root.path(), CopyPolicy::Strict)
        .convert(&missing)
        .await
        .unwrap();

    match outcome {
        Outcome::HelpRequested { bundle } => assert_eq!(bundle, missing),
        other => panic!("expected help, got {other:?}"),
    }
    assert!(entries(temp_root.path()).is_empty());
}

#[tokio::test]
async fn concurrent_conversions_get_distinct_contexts() {
    let bundle = bundle_with_app();
    let temp_root = tempfile::tempdir().unwrap();
    let converter = converter(temp_root.path(), CopyPolicy::Strict);

    let (first, second) = tokio::join!(
        converter.convert(bundle.path()),
        converter.convert(bundle.path())
    );
    let (Outcome::Converted(first), Outcome::Converted(second)) =
        (first.unwrap(), second.unwrap())
    else {
        panic!("expected two build contexts");
    };

    assert_ne!(first.build_context.path(), second.build_context.path());
    for report in [&first, &second] {
        assert!(report.build_context.digest().unwrap().matches());
        assert_eq!(entries(report.build_context.path()), vec!["Dockerfile", "rootfs"]);
    }
    assert_eq!(entries(temp_root.path()).len(), 2);
}

#[tokio::test]
async fn missing_rootfs_warns_in_lenient_mode() {
    let bundle = tempfile::tempdir().unwrap();
    let temp_root = tempfile::tempdir().unwrap();

    let Outcome::Converted(report) = converter(temp_root.path(), CopyPolicy::Lenient)
        .convert(bundle.path())
        .await
        .unwrap()
    else {
        panic!("expected a build context");
    };

    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("rootfs copy incomplete"));
    assert!(entries(&report.build_context.rootfs_path()).is_empty());
}

#[tokio::test]
async fn missing_rootfs_aborts_in_strict_mode() {
    let bundle = tempfile::tempdir().unwrap();
    let temp_root = tempfile::tempdir().unwrap();

    let err = converter(temp_root.path(), CopyPolicy::Strict)
        .convert(bundle.path())
        .await
        .unwrap_err();

    assert!(matches!(err, ConvertError::Filesystem { .. }));
    // The partial context stays for inspection.
    assert_eq!(entries(temp_root.path()).len(), 1);
}

#[tokio::test]
async fn template_errors_happen_before_staging() {
    let bundle = bundle_with_app();
    let temp_root = tempfile::tempdir().unwrap();
    let settings = SettingsBuilder::new()
        .temp_root(temp_root.path())
        .defaults(ExtractDefaults {
            entrypoint: "/bin/sh".into(),
            exposed_ports: vec!["not-a-port".into()],
        })
        .build();

    let err = Converter::new(settings)
        .unwrap()
        .convert(bundle.path())
        .await
        .unwrap_err();

    assert!(matches!(err, ConvertError::Template { .. }));
    assert!(entries(temp_root.path()).is_empty());
}

#[tokio::test]
async fn source_bundle_is_left_untouched() {
    let bundle = bundle_with_app();
    let temp_root = tempfile::tempdir().unwrap();
    let before = entries(&bundle.path().join("rootfs"));

    let Outcome::Converted(report) = converter(temp_root.path(), CopyPolicy::Strict)
        .convert(bundle.path())
        .await
        .unwrap()
    else {
        panic!("expected a build context");
    };

    std::fs::write(report.build_context.rootfs_path().join("bin/myapp"), b"mutated").unwrap();

    assert_eq!(entries(&bundle.path().join("rootfs")), before);
    assert_eq!(
        std::fs::read(bundle.path().join("rootfs/bin/myapp")).unwrap(),
        b"#!/bin/sh\nexec sleep 1\n"
    );
    assert_eq!(entries(bundle.path()), vec!["rootfs"]);
}

#[tokio::test]
async fn invalid_config_values_are_dropped_not_fatal() {
    let bundle = bundle_with_app();
    std::fs::write(
        bundle.path().join("config.json"),
        r#"{
            "process": {"args": ["/bin/myapp"], "env": ["MY VAR=1", "MODE=prod"]},
            "annotations": {
                "org.opencontainers.image.exposedPorts": "8080/tcp,http,80/TCP"
            }
        }"#,
    )
    .unwrap();
    let temp_root = tempfile::tempdir().unwrap();

    let Outcome::Converted(report) = converter(temp_root.path(), CopyPolicy::Strict)
        .convert(bundle.path())
        .await
        .unwrap()
    else {
        panic!("expected a build context");
    };

    assert!(report.dockerfile.contains("EXPOSE 8080/tcp 80/tcp\n"));
    assert!(report.dockerfile.contains("ENV MODE=\"prod\"\n"));
    assert!(!report.dockerfile.contains("MY VAR"));
}

#[cfg(unix)]
#[tokio::test]
async fn unreadable_source_file_only_warns_in_lenient_mode() {
    use std::os::unix::fs::PermissionsExt;

    let bundle = bundle_with_app();
    let secret = bundle.path().join("rootfs/etc/shadow");
    std::fs::write(&secret, b"root:*:0:0\n").unwrap();
    std::fs::set_permissions(&secret, std::fs::Permissions::from_mode(0o000)).unwrap();
    if std::fs::File::open(&secret).is_ok() {
        // Mode bits are not enforced for this user.
        return;
    }
    let temp_root = tempfile::tempdir().unwrap();

    let Outcome::Converted(report) = converter(temp_root.path(), CopyPolicy::Lenient)
        .convert(bundle.path())
        .await
        .unwrap()
    else {
        panic!("expected a build context");
    };

    assert!(!report.build_context.copy_report().is_complete());
    assert!(report.build_context.digest().is_none());
    assert!(report.build_context.verification_error().is_some());
    assert!(report.warnings.iter().any(|w| w.contains("rootfs copy incomplete")));
    assert!(report.warnings.iter().any(|w| w.starts_with("rootfs not verified")));
    assert!(report.build_context.rootfs_path().join("bin/myapp").is_file());

    let err = converter(temp_root.path(), CopyPolicy::Strict)
        .convert(bundle.path())
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::Filesystem { .. }));
}
