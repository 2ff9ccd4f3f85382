use vc3d_web::WebAnalyzer;

#[cfg(test)]
mod web_analyzer_tests {
    use super::*;

    const WEDGE_STL: &str = "solid wedge
facet normal 0 0 1
outer loop
vertex 0 0 0
vertex 3 0 0
vertex 0 3 0
endloop
endfacet
endsolid wedge
";

    #[test]
    fn test_analyze_returns_stats_json() {
        let analyzer = WebAnalyzer::new();
        let json = analyzer.analyze(WEDGE_STL.as_bytes(), "STL").ok().unwrap();
        assert_eq!(json, r#"{"format":"STL","vertexCount":3,"faceCount":1,"edgeCount":3}"#);
    }

    #[test]
    fn test_counts_ignore_target_size() {
        let mut analyzer = WebAnalyzer::default();
        analyzer.set_target_size(10.0);
        let json = analyzer.analyze(WEDGE_STL.as_bytes(), ".stl").ok().unwrap();
        assert!(json.contains(r#""vertexCount":3"#));
    }
}
