// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use pnmift::{
    arc_weight_image, connect_internal_seeds, costs_to_image, image_foresting_transform,
    labels_to_image, AdjacencyGraph, AdjacencyRelation, Forest, LabeledSeeds, MultiBandMap,
    ObjectRegion, OrientedWatershed, SeededWatershed, Voxel, VoxelMap,
};

extern crate clap;
extern crate image;

use clap::{App, Arg, ArgMatches};
use failure::{bail, format_err, Error};
use image::{DynamicImage, GenericImageView};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

fn main() {
    let matches = App::new("pnmift")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Object delineation by the Image Foresting Transform")
        .arg(
            Arg::with_name("image")
                .help("The image to delineate")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .help("Where to write the label image")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("seed")
                .help("A seed as x,y,label; label 0 is background")
                .short("s")
                .long("seed")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .required(true),
        )
        .arg(
            Arg::with_name("method")
                .help("The connectivity function")
                .short("m")
                .long("method")
                .takes_value(true)
                .possible_values(&["watershed", "oriented", "region"])
                .default_value("watershed"),
        )
        .arg(
            Arg::with_name("objmap")
                .help("Object-probability map, as a greyscale image")
                .short("o")
                .long("objmap")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("alpha")
                .help("Share of the object map in the arc weights, in [0, 1]")
                .short("a")
                .long("alpha")
                .takes_value(true)
                .default_value("0.0"),
        )
        .arg(
            Arg::with_name("radius")
                .help("Adjacency radius; 1 is 4-connected, 1.4142 (√2) is 8-connected")
                .short("r")
                .long("radius")
                .takes_value(true)
                .default_value("1.0"),
        )
        .arg(
            Arg::with_name("connect")
                .help("Join the object seeds along optimum paths first")
                .long("connect"),
        )
        .arg(
            Arg::with_name("costs")
                .help("Also write the path-cost map to this image")
                .long("costs")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .help("Log progress")
                .short("v")
                .long("verbose"),
        )
        .get_matches();

    if let Err(err) = run(&matches) {
        eprintln!("pnmift: {}", err);
        std::process::exit(1);
    }
}

fn parse_seed(arg: &str) -> Result<(i32, i32, i32), Error> {
    let fields: Vec<&str> = arg.split(',').map(str::trim).collect();
    if fields.len() != 3 {
        bail!("seed '{}' is not of the form x,y,label", arg);
    }
    Ok((fields[0].parse()?, fields[1].parse()?, fields[2].parse()?))
}

fn is_color(image: &DynamicImage) -> bool {
    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageLumaA8(_) => false,
        _ => true,
    }
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let level = if matches.is_present("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    SimpleLogger::new().with_level(level).init()?;

    let alpha: f32 = matches.value_of("alpha").unwrap_or("0.0").parse()?;
    let radius: f32 = matches.value_of("radius").unwrap_or("1.0").parse()?;
    let method = matches.value_of("method").unwrap_or("watershed");

    let input = image::open(matches.value_of("image").unwrap_or_default())?;
    let features = MultiBandMap::from_image(&input, is_color(&input));
    let lattice = *features.lattice();
    let graph = AdjacencyGraph::new(lattice, AdjacencyRelation::circular(radius))?;
    info!(
        "{}x{} image, {} bands, {} neighbours",
        lattice.xsize,
        lattice.ysize,
        features.bands(),
        graph.neighbor_count() - 1
    );

    let objmap = match matches.value_of("objmap") {
        None => None,
        Some(path) => {
            let grey = image::open(path)?.to_luma();
            if grey.dimensions() != input.dimensions() {
                bail!("object map {} does not match the image size", path);
            }
            Some(VoxelMap::from_luma_image(&grey))
        }
    };

    let mut seeds = LabeledSeeds::new();
    for arg in matches.values_of("seed").into_iter().flatten() {
        let (x, y, label) = parse_seed(arg)?;
        seeds.push_voxel(&lattice, Voxel::new(x, y, 0), label)?;
    }

    let need_objmap = || {
        objmap
            .as_ref()
            .ok_or_else(|| format_err!("method '{}' needs --objmap", method))
    };

    if matches.is_present("connect") {
        let before = seeds.len();
        seeds = connect_internal_seeds(&graph, &seeds, need_objmap()?)?;
        info!("seed connection added {} seeds", seeds.len() - before);
    }

    let forest: Forest<u32> = match method {
        "region" => {
            let cost_fn = ObjectRegion::new(&graph, need_objmap()?, &features, alpha)?;
            image_foresting_transform(&graph, &seeds, cost_fn)?
        }
        "oriented" => {
            let weight = arc_weight_image(&graph, &features, objmap.as_ref(), alpha)?;
            let cost_fn = OrientedWatershed::new(&weight, need_objmap()?)?;
            image_foresting_transform(&graph, &seeds, cost_fn)?
        }
        _ => {
            let weight = arc_weight_image(&graph, &features, objmap.as_ref(), alpha)?;
            let cost_fn = SeededWatershed::new(&weight)?;
            image_foresting_transform(&graph, &seeds, cost_fn)?
        }
    };
    info!("{} delineation finished", method);

    let output = matches.value_of("output").unwrap_or_default();
    labels_to_image(forest.labels(), &lattice)?.save(output)?;
    if let Some(path) = matches.value_of("costs") {
        costs_to_image(forest.costs(), &lattice)?.save(path)?;
    }
    Ok(())
}
