//! Hardhat project with OpenZeppelin contracts and a plain HTML frontend.

use super::{Blueprint, FeatureTemplate, FileTemplate};

pub(super) static BLUEPRINT: Blueprint = Blueprint {
    slots: &["deploy_steps", "frontend_scripts", "js_deps"],
    base: &[
        FileTemplate {
            path: "README.md",
            body: r#"# {{name}}

Smart contract project scaffolded by hackpilot ({{style}} style).

## Features

{{features_markdown}}
## Run locally

```bash
npm install
npx hardhat compile
npx hardhat node
npx hardhat run scripts/deploy.js --network localhost
```

Open `frontend/index.html` in a browser with a wallet extension.
"#,
        },
        FileTemplate {
            path: "package.json",
            body: r#"{
  "name": "{{slug}}",
  "version": "0.1.0",
  "private": true,
  "scripts": {
    "compile": "hardhat compile",
    "test": "hardhat test",
    "deploy": "hardhat run scripts/deploy.js"
  },
  "dependencies": {
{{js_deps}}    "@openzeppelin/contracts": "^5.0.2"
  },
  "devDependencies": {
    "@nomicfoundation/hardhat-toolbox": "^5.0.0",
    "hardhat": "^2.22.10"
  }
}
"#,
        },
        FileTemplate {
            path: "hardhat.config.js",
            body: r#"require('@nomicfoundation/hardhat-toolbox');

const { PRIVATE_KEY, RPC_URL } = process.env;

module.exports = {
  solidity: '0.8.24',
  networks: RPC_URL && PRIVATE_KEY
    ? { testnet: { url: RPC_URL, accounts: [PRIVATE_KEY] } }
    : {},
};
"#,
        },
        FileTemplate {
            path: ".env.example",
            body: "RPC_URL=\nPRIVATE_KEY=\n",
        },
        FileTemplate {
            path: ".gitignore",
            body: "node_modules/\nartifacts/\ncache/\n.env\n",
        },
        FileTemplate {
            path: "scripts/deploy.js",
            body: r#"const hre = require('hardhat');

async function main() {
  console.log('Deploying {{name}} contracts...');
{{deploy_steps}}}

main().catch((err) => {
  console.error(err);
  process.exitCode = 1;
});
"#,
        },
        FileTemplate {
            path: "frontend/index.html",
            body: r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>{{name}}</title>
    <link rel="stylesheet" href="styles.css" />
  </head>
  <body>
    <main class="container">
      <section class="card">
        <h1>{{name}}</h1>
        <p id="account">Not connected</p>
      </section>
    </main>
{{frontend_scripts}}  </body>
</html>
"#,
        },
        FileTemplate {
            path: "frontend/styles.css",
            body: "{{stylesheet}}",
        },
    ],
    per_feature: &[],
    per_feature_snippets: &[],
    features: &[
        FeatureTemplate {
            name: "token",
            summary: "ERC-20 token minted to the deployer.",
            files: &[FileTemplate {
                path: "contracts/HackToken.sol",
                body: r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.24;

import "@openzeppelin/contracts/token/ERC20/ERC20.sol";

contract HackToken is ERC20 {
    constructor(uint256 initialSupply) ERC20("{{name}} Token", "HACK") {
        _mint(msg.sender, initialSupply * 10 ** decimals());
    }
}
"#,
            }],
            snippets: &[("deploy_steps", DEPLOY_TOKEN)],
        },
        FeatureTemplate {
            name: "nft",
            summary: "ERC-721 collectibles the owner can mint.",
            files: &[FileTemplate {
                path: "contracts/HackCollectible.sol",
                body: r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.24;

import "@openzeppelin/contracts/token/ERC721/ERC721.sol";
import "@openzeppelin/contracts/access/Ownable.sol";

contract HackCollectible is ERC721, Ownable {
    uint256 private _nextId;

    constructor() ERC721("{{name}} Collectible", "HNFT") Ownable(msg.sender) {}

    function mint(address to) external onlyOwner returns (uint256 id) {
        id = _nextId++;
        _safeMint(to, id);
    }
}
"#,
            }],
            snippets: &[("deploy_steps", DEPLOY_NFT)],
        },
        FeatureTemplate {
            name: "voting",
            summary: "One-address-one-vote proposals.",
            files: &[FileTemplate {
                path: "contracts/Voting.sol",
                body: r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.24;

contract Voting {
    struct Proposal {
        string title;
        uint256 votes;
    }

    Proposal[] public proposals;
    mapping(address => bool) public hasVoted;

    event Voted(address indexed voter, uint256 indexed proposal);

    function addProposal(string calldata title) external {
        proposals.push(Proposal(title, 0));
    }

    function vote(uint256 proposal) external {
        require(!hasVoted[msg.sender], "already voted");
        require(proposal < proposals.length, "no such proposal");
        hasVoted[msg.sender] = true;
        proposals[proposal].votes += 1;
        emit Voted(msg.sender, proposal);
    }

    function proposalCount() external view returns (uint256) {
        return proposals.length;
    }
}
"#,
            }],
            snippets: &[("deploy_steps", DEPLOY_VOTING)],
        },
        FeatureTemplate {
            name: "escrow",
            summary: "Buyer funds held until the arbiter releases or refunds them.",
            files: &[FileTemplate {
                path: "contracts/Escrow.sol",
                body: r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.24;

contract Escrow {
    address public immutable buyer;
    address payable public immutable seller;
    address public immutable arbiter;
    bool public settled;

    constructor(address payable _seller, address _arbiter) payable {
        buyer = msg.sender;
        seller = _seller;
        arbiter = _arbiter;
    }

    modifier onlyArbiter() {
        require(msg.sender == arbiter, "only arbiter");
        require(!settled, "already settled");
        _;
    }

    function release() external onlyArbiter {
        settled = true;
        seller.transfer(address(this).balance);
    }

    function refund() external onlyArbiter {
        settled = true;
        payable(buyer).transfer(address(this).balance);
    }
}
"#,
            }],
            snippets: &[("deploy_steps", DEPLOY_ESCROW)],
        },
        FeatureTemplate {
            name: "wallet",
            summary: "Browser wallet connection for the frontend.",
            files: &[FileTemplate {
                path: "frontend/wallet.js",
                body: r#"import { BrowserProvider } from 'https://cdn.jsdelivr.net/npm/ethers@6.13.2/+esm';

async function connect() {
  if (!window.ethereum) {
    document.getElementById('account').textContent = 'No wallet found';
    return;
  }
  const provider = new BrowserProvider(window.ethereum);
  const signer = await provider.getSigner();
  document.getElementById('account').textContent = await signer.getAddress();
}

connect();
"#,
            }],
            snippets: &[
                (
                    "frontend_scripts",
                    "    <script type=\"module\" src=\"wallet.js\"></script>\n",
                ),
                ("js_deps", "    \"ethers\": \"^6.13.2\",\n"),
            ],
        },
    ],
};

const DEPLOY_TOKEN: &str = r#"
  const token = await hre.ethers.deployContract('HackToken', [1000000n]);
  await token.waitForDeployment();
  console.log(`HackToken: ${await token.getAddress()}`);
"#;

const DEPLOY_NFT: &str = r#"
  const nft = await hre.ethers.deployContract('HackCollectible');
  await nft.waitForDeployment();
  console.log(`HackCollectible: ${await nft.getAddress()}`);
"#;

const DEPLOY_VOTING: &str = r#"
  const voting = await hre.ethers.deployContract('Voting');
  await voting.waitForDeployment();
  console.log(`Voting: ${await voting.getAddress()}`);
"#;

const DEPLOY_ESCROW: &str = r#"
  const [buyer] = await hre.ethers.getSigners();
  const escrow = await hre.ethers.deployContract('Escrow', [buyer.address, buyer.address]);
  await escrow.waitForDeployment();
  console.log(`Escrow: ${await escrow.getAddress()}`);
"#;
