use pixboard::coords::index_from_point_raw;
use pixboard::render::{GridStyle, Surfaces};
use pixboard::{
    decode, decode_buffer, encode, index_from_point, Board, BoardSource, Layout, PayloadPolicy,
    PixelBuffer, Rgb, SurfaceGeometry,
};

fn board(width: i32, height: i32) -> Board {
    Board::new(BoardSource::Dimensions { width, height }, PayloadPolicy::Reject).unwrap()
}

#[test]
fn paint_encode_decode_scenario() {
    let mut board = board(3, 2);
    let action = board.paint(0, Rgb::BLACK, 1.0).unwrap().unwrap();
    assert_eq!((action.index, action.r, action.g, action.b), (0, 0, 0, 0));

    let decoded = decode(&board.encode()).unwrap();
    assert_eq!((decoded.width, decoded.height), (3, 2));
    assert_eq!(&decoded.cells[0..3], &[0, 0, 0]);
    assert!(decoded.cells[3..].iter().all(|&b| b == 255));

    let restored = Board::new(BoardSource::Encoded(board.encode()), PayloadPolicy::Reject).unwrap();
    assert_eq!(restored.color(0).unwrap(), Rgb::BLACK);
    for i in 1..6 {
        assert_eq!(restored.color(i).unwrap(), Rgb::WHITE);
    }
}

#[test]
fn round_trip_over_many_shapes() {
    for (w, h) in [(1, 1), (1, 17), (17, 1), (20, 20), (33, 7)] {
        let mut buffer = PixelBuffer::new(w, h).unwrap();
        let mut engine = pixboard::PaintEngine::new();
        for i in (0..buffer.len()).step_by(3) {
            let v = (i % 251) as u8;
            engine
                .paint(&mut buffer, i, Rgb::new(v, 255 - v, v / 2), 0.7)
                .unwrap();
        }
        let back = decode_buffer(&encode(&buffer), PayloadPolicy::Reject).unwrap();
        assert_eq!(back, buffer, "{w}x{h}");
    }
}

#[test]
fn idempotent_and_debounced_paints_leave_no_trace() {
    let mut board = board(4, 4);
    let before = board.encode();
    assert!(board.paint(5, Rgb::WHITE, 1.0).unwrap().is_none());
    assert_eq!(board.encode(), before);

    assert!(board.paint(5, Rgb::new(200, 100, 50), 1.0).unwrap().is_some());
    assert!(board.paint(5, Rgb::new(1, 2, 3), 1.0).unwrap().is_none());
    assert_eq!(board.color(5).unwrap(), Rgb::new(200, 100, 50));
}

#[test]
fn pointer_maps_onto_rendered_cells() {
    let geometry = SurfaceGeometry::unscaled(400, 400);
    assert_eq!(index_from_point(399.0, 399.0, &geometry, 20, 20), Some(399));
    assert_eq!(index_from_point_raw(400.0, 400.0, &geometry, 20, 20), -1);
    assert_eq!(index_from_point_raw(-3.0, 5.0, &geometry, 20, 20), -1);
}

#[test]
fn layout_drives_mapping_and_both_surfaces() {
    let layout = Layout::fit(500.0, 300.0, 10, 5, 2.0);
    assert_eq!(layout.cell_size, 50);
    assert_eq!((layout.backing_width, layout.backing_height), (1000, 500));

    // Logical point in the last cell of the second row
    let index = index_from_point(499.0, 99.0, &layout.geometry(), 10, 5);
    assert_eq!(index, Some(19));

    let mut surfaces = Surfaces::new(GridStyle::default(), [0, 0, 0, 255]);
    surfaces.resize(layout);
    assert_eq!(surfaces.board_layer().len(), 1000 * 500 * 4);
    assert_eq!(surfaces.overlay_layer().len(), 1000 * 500 * 4);
}

#[test]
fn import_swaps_in_different_dimensions() {
    let mut small = board(2, 2);
    let mut large = board(8, 3);
    large.paint(23, Rgb::new(9, 8, 7), 1.0).unwrap();

    small.import(&large.state()).unwrap();
    assert_eq!((small.width(), small.height()), (8, 3));
    assert_eq!(small.buffer().raw().len(), 8 * 3 * 3);
    assert_eq!(small.color(23).unwrap(), Rgb::new(9, 8, 7));
}
