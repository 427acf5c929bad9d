use geocat_domain::{BoundingBox, Extent, Geometry, RecordId};
use geocat_storage::ExtentStore;
use proptest::prelude::*;

fn geo_box() -> impl Strategy<Value = BoundingBox> {
    (-179.0f64..178.0, -89.0f64..88.0, 0.0f64..1.5, 0.0f64..1.5).prop_map(
        |(lon, lat, width, height)| {
            BoundingBox::checked(lon, lat, (lon + width).min(180.0), (lat + height).min(90.0))
                .expect("generated box is valid")
        },
    )
}

fn box_polygon(bbox: BoundingBox) -> Geometry {
    Geometry::Polygon(vec![vec![
        [bbox.min_lon, bbox.min_lat],
        [bbox.max_lon, bbox.min_lat],
        [bbox.max_lon, bbox.max_lat],
        [bbox.min_lon, bbox.max_lat],
        [bbox.min_lon, bbox.min_lat],
    ]])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn intersecting_equals_brute_force_predicate(
        boxes in proptest::collection::vec(geo_box(), 0..24),
        query in geo_box(),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async {
            let temp = tempfile::tempdir().unwrap();
            let store = ExtentStore::builder().root(temp.path()).connect().await.unwrap();

            let mut expected = Vec::new();
            for (i, bbox) in boxes.iter().enumerate() {
                let id = RecordId::new(format!("rec-{i:03}"));
                store.put(&Extent::new(id.clone(), box_polygon(*bbox), *bbox)).await.unwrap();
                if bbox.intersects(&query) {
                    expected.push(id);
                }
            }

            prop_assert_eq!(store.intersecting(&query), expected);
            Ok(())
        })?;
    }
}
