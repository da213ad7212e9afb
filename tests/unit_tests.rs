use approx::assert_relative_eq;
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use single_enrichment::analyzer::{
    Calculable, Contingency, Fittable, Gsea, GseaOptions, SsGsea, SsGseaOptions,
};
use single_enrichment::data::{FeatureSet, FeatureUniverse, ProfileMatrix, ReferenceSet};
use single_enrichment::enrichment::{ContingencyOptions, EnrichmentTable};
use single_enrichment::testing::Alternative;

#[cfg(test)]
mod quick_test {
    use super::*;

    fn universe_1_to_10() -> FeatureUniverse<u32> {
        (1..=10).collect()
    }

    #[test]
    fn check_fisher_overlap_against_fixed_universe() {
        // Universe {1..10}, T1 = {1, 2, 3}, object {1, 2, 8}
        // Table [[2, 1], [1, 6]]: P(X >= 2) for X ~ Hypergeom(10, 3, 3) = 22/120
        let mut reference = ReferenceSet::new();
        reference.insert("T1".to_string(), [1u32, 2, 3].into());

        let mut fet = Contingency::fisher();
        fet.set_universe(universe_1_to_10());
        fet.fit(reference, true, None).unwrap();

        let object: FeatureSet<u32> = [1, 2, 8].into();
        let table = fet.calc(&object, &ContingencyOptions::default()).unwrap();

        assert_eq!(table.len(), 1);
        let row = &table.rows()[0];
        assert_eq!(row.term, "T1");
        assert_eq!(row.overlap, FeatureSet::from([1, 2]));
        assert_eq!(row.hits, 2);
        assert_eq!(row.total, 3);
        assert_relative_eq!(row.p_value, 22.0 / 120.0, epsilon = 1e-10);
    }

    #[test]
    fn check_fisher_alternatives() {
        let mut reference = ReferenceSet::new();
        reference.insert("T1".to_string(), [1u32, 2, 3].into());

        let mut fet = Contingency::fisher();
        fet.set_universe(universe_1_to_10());
        fet.fit(reference, true, None).unwrap();
        let object: FeatureSet<u32> = [1, 2, 8].into();

        let less = ContingencyOptions {
            alternative: Alternative::Less,
            ..ContingencyOptions::default()
        };
        let table = fet.calc(&object, &less).unwrap();
        assert_relative_eq!(table.rows()[0].p_value, 119.0 / 120.0, epsilon = 1e-10);

        let two_sided = ContingencyOptions {
            alternative: Alternative::TwoSided,
            ..ContingencyOptions::default()
        };
        let table = fet.calc(&object, &two_sided).unwrap();
        assert_relative_eq!(table.rows()[0].p_value, 22.0 / 120.0, epsilon = 1e-10);
    }

    #[test]
    fn check_small_terms_give_empty_table() {
        let mut reference = ReferenceSet::new();
        reference.insert("a".to_string(), [1u32, 2].into());
        reference.insert("b".to_string(), [3u32].into());

        let mut fet = Contingency::fisher();
        fet.fit(reference, false, None).unwrap();
        assert!(fet.reference().unwrap().is_empty(), "every term is below the minimum size");

        let table: EnrichmentTable<u32> = fet
            .calc(&[1, 2, 3].into(), &ContingencyOptions::default())
            .unwrap();
        assert!(table.is_empty());
        assert_eq!(
            table.columns(),
            &["p value", "adjusted p value", "overlap", "hit No.", "total No."]
        );
    }

    #[test]
    fn check_last_ranked_single_feature_tag() {
        // feature 5 has the lowest value; every other feature ranks above it
        let features: Vec<u32> = (1..=10).collect();
        let values: Vec<f64> = features
            .iter()
            .map(|&f| if f == 5 { -100.0 } else { 20.0 - f as f64 })
            .collect();
        let profile = ProfileMatrix::from_vector("sample", features, values).unwrap();

        let mut reference = ReferenceSet::new();
        reference.insert("single".to_string(), [5u32].into());

        let mut gsea = Gsea::new();
        gsea.set_universe(universe_1_to_10());
        gsea.fit(reference, true, Some(1)).unwrap();
        gsea.calc(&profile, &GseaOptions::default()).unwrap();

        let sums = gsea.running_sums().unwrap();
        let sum = &sums[0];
        assert_eq!(sum.ranked[9], 5);
        assert_relative_eq!(sum.posi[[0, 9]], 1.0, epsilon = 1e-12);
        assert_relative_eq!(sum.nega[[0, 8]], 1.0, epsilon = 1e-12);

        let es = sum.es.row(0);
        for i in 1..9 {
            assert!(es[i] <= es[i - 1], "es should not increase before the tag at {}", i);
        }
        assert_relative_eq!(
            gsea.result().unwrap().get("single", "sample").unwrap(),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_sparse_matrix_based_workflow() {
        // 5 genes x 3 cells
        let mut coo = CooMatrix::new(5, 3);
        coo.push(0, 0, 5.0f64);
        coo.push(1, 0, 4.0);
        coo.push(2, 0, 3.0);
        coo.push(3, 1, 5.0);
        coo.push(4, 1, 4.0);
        coo.push(0, 2, 1.0);
        coo.push(4, 2, 2.0);
        let matrix = CsrMatrix::from(&coo);

        let genes: Vec<String> = ["CD3E", "CD4", "IL7R", "MS4A1", "CD79A"]
            .iter()
            .map(|g| g.to_string())
            .collect();
        let cells: Vec<String> = ["t1", "b1", "x1"].iter().map(|c| c.to_string()).collect();
        let profile = ProfileMatrix::from_csr(&matrix, genes, cells).unwrap();

        let mut reference = ReferenceSet::new();
        reference.insert(
            "T_CELL".to_string(),
            ["CD3E", "CD4", "IL7R"].iter().map(|g| g.to_string()).collect(),
        );
        reference.insert(
            "B_CELL".to_string(),
            ["MS4A1", "CD79A", "CD19"].iter().map(|g| g.to_string()).collect(),
        );

        let mut ssgsea = SsGsea::new();
        ssgsea.fit(reference, false, Some(2)).unwrap();
        let output = ssgsea.calc(&profile, &SsGseaOptions::default()).unwrap();
        let table = output.as_table().unwrap();

        assert_eq!(table.samples(), &["t1", "b1", "x1"]);
        // T cell markers lead the ranking of t1 and saturate the curve
        assert_relative_eq!(table.get("T_CELL", "t1").unwrap(), 1.0, epsilon = 1e-12);
        // x1: CD79A ranks first, so the B cell tag peaks higher
        assert!(table.get("B_CELL", "x1").unwrap() > table.get("T_CELL", "x1").unwrap());

        let sums = ssgsea.running_sums().unwrap();
        assert_eq!(sums.len(), 3);
        assert_eq!(sums[0].ranked[0], "CD3E");
        assert_eq!(sums[1].ranked[0], "MS4A1");
        assert_eq!(sums[2].ranked[0], "CD79A");
    }
}
