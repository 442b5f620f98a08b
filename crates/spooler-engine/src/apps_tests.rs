// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use spooler_core::JobDescriptionBuilder;
use std::path::PathBuf;

#[test]
fn hucore_decon_spec_strips_the_templates_local_path() {
    let job = JobDescriptionBuilder::default()
        .kind(JobKind::HuDecon)
        .exec("/opt/hucore/bin/hucore")
        .template(PathBuf::from("/opt/templates/default.hgsb"))
        .build();
    let spec = build(&job, Path::new("/var/spool/backend"));

    assert_eq!(spec.exec, PathBuf::from("/opt/hucore/bin/hucore"));
    assert!(spec.args.iter().any(|a| a == "-template"));
    assert_eq!(spec.args.last().unwrap(), "default.hgsb");
    assert_eq!(spec.output_dir, PathBuf::from(format!("/var/spool/backend/results_{}", job.uid)));
}

#[test]
fn hucore_decon_spec_includes_the_jobs_input_files() {
    let job = JobDescriptionBuilder::default()
        .kind(JobKind::HuDecon)
        .exec("/opt/hucore/bin/hucore")
        .template(PathBuf::from("/opt/templates/default.hgsb"))
        .infiles(vec![PathBuf::from("/data/one.tif"), PathBuf::from("/data/two.tif")])
        .build();
    let spec = build(&job, Path::new("/var/spool/backend"));

    assert!(spec.args.contains(&"/data/one.tif".to_string()));
    assert!(spec.args.contains(&"/data/two.tif".to_string()));
    // infiles must come after the template flag, not interleave with it.
    let template_pos = spec.args.iter().position(|a| a == "-template").unwrap();
    let first_infile_pos = spec.args.iter().position(|a| a == "/data/one.tif").unwrap();
    assert!(first_infile_pos > template_pos);
}

#[test]
fn dummy_sleep_spec_has_no_template_argument() {
    let job = JobDescriptionBuilder::default().kind(JobKind::DummySleep).exec("/bin/sleep").build();
    let spec = build(&job, Path::new("/var/spool/backend"));

    assert_eq!(spec.exec, PathBuf::from("/bin/sleep"));
    assert_eq!(spec.args, vec!["1.6".to_string()]);
}

#[test]
fn deletejobs_spec_is_harmless_but_never_invoked_by_the_control_loop() {
    let job = JobDescriptionBuilder::default().kind(JobKind::DeleteJobs).build();
    let spec = build(&job, Path::new("/var/spool/backend"));
    assert!(spec.args.is_empty());
}
