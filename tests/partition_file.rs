use partlab::io::{
    PartitionReader, partition_file_path, read_partition_file, write_partition_file,
};
use partlab::layout::{Layout, Point2, cluster_layout};
use partlab::partitioning::PartitionAssignment;
use partlab::PartLabError;
use std::fs;
use std::path::Path;

#[test]
fn short_file_is_a_count_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("g.metis.parts.2");
    fs::write(&path, "0\n1\n1\n").unwrap();

    let err = read_partition_file(&path, 5).unwrap_err();
    match err {
        PartLabError::PartitionCountMismatch {
            expected, found, ..
        } => assert_eq!((expected, found), (5, 3)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn written_file_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let graph_file = dir.path().join("grid.metis");
    let path = partition_file_path(&graph_file, 4);
    assert_eq!(path.file_name().unwrap(), "grid.metis.parts.4");

    let a = PartitionAssignment::new(vec![0, 3, 1, 2, 2, 0]);
    write_partition_file(&path, &a).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "0\n3\n1\n2\n2\n0\n");

    let back = read_partition_file(&path, 6).unwrap();
    assert_eq!(back, a);
    assert_eq!(back.part_of(2), Some(3));
    assert_eq!(back.num_parts().unwrap(), 4);
    assert_eq!(back.part_sizes().into_values().collect::<Vec<_>>(), vec![2, 1, 2, 1]);
}

#[test]
fn non_integer_line_reports_its_number() {
    let err = PartitionReader::named("parts")
        .read_str("0\n1\n-1\n", 3)
        .unwrap_err();
    assert!(matches!(err, PartLabError::Format { line: 3, .. }));
}

#[test]
fn path_keeps_directory() {
    let p = partition_file_path(Path::new("data/web.metis"), 12);
    assert_eq!(p, Path::new("data/web.metis.parts.12"));
}

#[test]
fn largest_representable_id_is_an_error_downstream() {
    let a = PartitionReader::default()
        .read_str("0\n18446744073709551615\n", 2)
        .unwrap();
    let base: Layout = [(1, Point2::new(0.0, 0.0)), (2, Point2::new(1.0, 0.0))].into();
    assert!(matches!(
        cluster_layout(&base, &a, (-1.0, 1.0)),
        Err(PartLabError::InvalidParameter(_))
    ));
}
