//! Integration tests for grid geometry and fuzzy colour coding.

use hexsom::{
    colors_for, connections, contract_layout, fuzzy_colour_coding, map_distance, Config, DistanceSource, Grid,
    GridConfig, GridError, LayoutConfig, Rgb, SimilarityMatrix, Topology, UnitDistanceMatrix,
};
use std::collections::HashSet;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a hexagonal map with a hole pattern, as left by a mnemonic SOM.
fn create_mnemonic_grid(x_size: usize, y_size: usize) -> Grid {
    let vectors = (0..x_size * y_size)
        .map(|i| {
            let (x, y) = (i % x_size, i / x_size);
            if (x + 2 * y) % 5 == 0 {
                None
            } else {
                Some(vec![x as f64, y as f64, (x * y) as f64])
            }
        })
        .collect();
    Grid::from_vectors(x_size, y_size, 1, 3, Topology::Hexagonal, vectors).unwrap()
}

#[test]
fn test_rectangular_centre_scenario() {
    let grid = Grid::new_geometric(3, 3, 1, Topology::Rectangular).unwrap();
    let neighbors: Vec<_> = grid.neighbors(1, 1, 0).unwrap().iter().map(|u| (u.x, u.y)).collect();
    assert_eq!(neighbors, vec![(0, 1), (2, 1), (1, 0), (1, 2)]);
}

#[test]
fn test_hexagonal_odd_row_scenario() {
    let grid = Grid::new_geometric(4, 4, 1, Topology::Hexagonal).unwrap();
    let neighbors: HashSet<_> = grid.neighbors(1, 1, 0).unwrap().iter().map(|u| (u.x, u.y)).collect();
    let expected: HashSet<_> = [(0, 1), (2, 1), (0, 0), (1, 0), (0, 2), (1, 2)].into_iter().collect();
    assert_eq!(neighbors, expected);
}

#[test]
fn test_hexagonal_adjacency_properties() {
    let grid = create_mnemonic_grid(6, 7);

    for unit in grid.units() {
        let neighbors = grid.neighbors_of(unit).unwrap();
        assert!(neighbors.len() <= 6);

        for other in &neighbors {
            let back = grid.neighbors_of(other).unwrap();
            assert!(back.iter().any(|u| u.coords() == unit.coords()));
        }
    }

    for y in 0..grid.y_size() {
        for x in 0..grid.x_size() {
            assert_eq!(
                grid.has_neighbor(x, y).unwrap(),
                !grid.neighbors(x, y, 0).unwrap().is_empty()
            );
        }
    }
}

#[test]
fn test_map_distance_properties() {
    let grid = Grid::new_geometric(3, 4, 2, Topology::Hexagonal).unwrap();
    let units: Vec<_> = grid.units().collect();

    for a in &units {
        assert_eq!(grid.map_distance(a, a), 0.0);
        for b in &units {
            assert_eq!(grid.map_distance(a, b), grid.map_distance(b, a));
            assert_eq!(grid.map_distance(a, b), map_distance(a.coords(), b.coords()));
        }
    }
}

#[test]
fn test_concurrent_neighbor_reads() {
    let grid = create_mnemonic_grid(8, 8);
    let expected: Vec<usize> = grid
        .units()
        .map(|u| grid.neighbors_of(u).unwrap().len())
        .collect();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let counts: Vec<usize> = grid
                    .units()
                    .map(|u| grid.neighbors_of(u).unwrap().len())
                    .collect();
                assert_eq!(counts, expected);
            });
        }
    });
}

#[test]
fn test_out_of_bounds_addressing() {
    let grid = Grid::new_geometric(2, 3, 1, Topology::Rectangular).unwrap();

    match grid.get(2, 0, 0) {
        Err(GridError::OutOfBounds { extent, .. }) => assert_eq!(extent, (2, 3, 1)),
        other => panic!("expected OutOfBounds, got {:?}", other),
    }
    // edge units simply have fewer neighbors
    assert_eq!(grid.neighbors(1, 2, 0).unwrap().len(), 2);
}

#[test]
fn test_similarity_rows_normalized() {
    let grid = create_mnemonic_grid(5, 5);
    for source in [DistanceSource::Map, DistanceSource::Weights] {
        let matrix = UnitDistanceMatrix::build(&grid, source);
        let similarity = SimilarityMatrix::from_distances(&matrix, 3.0).unwrap();
        for i in 0..similarity.size() {
            let sum: f64 = similarity.row(i).iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }
}

#[test]
fn test_contraction_zero_rounds() {
    init_logging();

    let grid = Grid::new_geometric(4, 5, 1, Topology::Hexagonal).unwrap();
    let positions = contract_layout(&UnitDistanceMatrix::from_grid(&grid), 1.0, 0).unwrap();

    for ((x, y), p) in positions.iter() {
        assert_eq!(p.x, x as f64);
        assert_eq!(p.y, y as f64);
    }
}

#[test]
fn test_contraction_stays_inside_grid() {
    init_logging();

    let grid = create_mnemonic_grid(6, 5);
    let matrix = UnitDistanceMatrix::from_weights(&grid);
    let positions = contract_layout(&matrix, 10.0, 8).unwrap();

    for p in positions.points() {
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!((0.0..=5.0).contains(&p.x));
        assert!((0.0..=4.0).contains(&p.y));
    }
}

#[test]
fn test_corner_colour_scenario() {
    let grid = Grid::new_geometric(2, 2, 1, Topology::Rectangular).unwrap();
    let positions = contract_layout(&UnitDistanceMatrix::from_grid(&grid), 1.0, 0).unwrap();
    let colors = colors_for(&positions);

    assert_eq!(colors.get(0, 0), Some(Rgb::new(255, 255, 0)));
}

#[test]
fn test_growth_then_layout() {
    init_logging();

    let grid = Grid::new(&GridConfig {
        x_size: 3,
        y_size: 3,
        topology: Topology::Hexagonal,
        weight_dimension: 4,
        seed: Some(11),
        ..Default::default()
    })
    .unwrap();

    let grown = grid.with_inserted_column(1).unwrap().with_inserted_row(0).unwrap();
    assert_eq!(grown.dimensions(), (4, 4, 1));
    assert_eq!(grown.occupied_count(), 16);

    let positions = contract_layout(&UnitDistanceMatrix::from_weights(&grown), 1.0, 2).unwrap();
    let segments = connections(&positions, grown.topology());
    assert_eq!(positions.points().len(), 16);
    assert!(segments.iter().all(|s| s.from != s.to));
}

#[test]
fn test_full_pipeline_from_config() {
    init_logging();

    let config = Config {
        grid: GridConfig {
            x_size: 6,
            y_size: 4,
            topology: Topology::Hexagonal,
            weight_dimension: 8,
            seed: Some(3),
            num_threads: 2,
            ..Default::default()
        },
        layout: LayoutConfig {
            temperature: 0.2,
            rounds: 4,
            source: DistanceSource::Weights,
        },
    };
    config.validate().unwrap();

    let grid = Grid::new(&config.grid).unwrap();
    let first = fuzzy_colour_coding(&grid, &config).unwrap();
    let second = fuzzy_colour_coding(&grid, &config).unwrap();

    assert_eq!(first.positions, second.positions);
    assert_eq!(first.colors, second.colors);
    assert_eq!(first.colors.colors().len(), 24);
}

#[test]
fn test_invalid_layout_parameters() {
    let grid = Grid::new_geometric(3, 3, 1, Topology::Rectangular).unwrap();
    let config = Config {
        layout: LayoutConfig {
            temperature: -1.0,
            ..Default::default()
        },
        ..Default::default()
    };

    assert!(matches!(
        fuzzy_colour_coding(&grid, &config),
        Err(GridError::InvalidParameter(_))
    ));
}
